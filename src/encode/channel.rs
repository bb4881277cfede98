use crate::foundation::error::{BounceError, BounceResult};
use std::io::{PipeReader, PipeWriter, Write as _};
use std::process::Stdio;

/// Observable lifecycle of a [`FrameChannel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// Both ends are open and no role has been chosen yet.
    Created,
    /// This process reads; the write end has been closed.
    ReadBound,
    /// This process writes; the read end has been closed.
    WriteBound,
    /// The bound end has been closed.
    Closed,
}

enum Ends {
    Created {
        reader: PipeReader,
        writer: PipeWriter,
    },
    Read(PipeReader),
    Write(PipeWriter),
    Closed,
}

/// Unidirectional OS pipe that carries raw frames to a child process.
///
/// A channel takes exactly one role. Binding a role closes the other end at once so the peer
/// sees EOF (or a broken pipe) as soon as the bound end goes away. Asking again for the role
/// already bound hands back the same end; asking for the opposite role is an error. Whatever
/// ends are still open are closed on drop.
pub struct FrameChannel {
    ends: Ends,
}

impl std::fmt::Debug for FrameChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameChannel")
            .field("state", &self.state())
            .finish()
    }
}

impl FrameChannel {
    /// Allocate the underlying OS pipe.
    pub fn new() -> BounceResult<Self> {
        let (reader, writer) = std::io::pipe()
            .map_err(|e| BounceError::channel(format!("failed to allocate pipe: {e}")))?;
        tracing::debug!("frame channel created");
        Ok(Self {
            ends: Ends::Created { reader, writer },
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        match self.ends {
            Ends::Created { .. } => ChannelState::Created,
            Ends::Read(_) => ChannelState::ReadBound,
            Ends::Write(_) => ChannelState::WriteBound,
            Ends::Closed => ChannelState::Closed,
        }
    }

    /// Duplicate the read end for use as a child's standard input.
    ///
    /// Only legal before a role is bound. The duplicate belongs to the returned [`Stdio`]; the
    /// parent's copy of it is released when the owning `Command` is dropped.
    pub fn child_stdin(&self) -> BounceResult<Stdio> {
        let Ends::Created { reader, .. } = &self.ends else {
            return Err(BounceError::channel(format!(
                "cannot hand the read end to a child in state {:?}",
                self.state()
            )));
        };
        let dup = reader
            .try_clone()
            .map_err(|e| BounceError::channel(format!("failed to duplicate read end: {e}")))?;
        Ok(Stdio::from(dup))
    }

    /// Take the read role, closing the write end.
    pub fn bind_read(&mut self) -> BounceResult<&mut PipeReader> {
        self.ends = match std::mem::replace(&mut self.ends, Ends::Closed) {
            Ends::Created { reader, writer } => {
                drop(writer);
                tracing::debug!("frame channel bound for reading");
                Ends::Read(reader)
            }
            other => other,
        };
        let state = self.state();
        match &mut self.ends {
            Ends::Read(reader) => Ok(reader),
            _ => Err(role_error("read", state)),
        }
    }

    /// Take the write role, closing the read end.
    pub fn bind_write(&mut self) -> BounceResult<&mut PipeWriter> {
        self.ends = match std::mem::replace(&mut self.ends, Ends::Closed) {
            Ends::Created { reader, writer } => {
                drop(reader);
                tracing::debug!("frame channel bound for writing");
                Ends::Write(writer)
            }
            other => other,
        };
        let state = self.state();
        match &mut self.ends {
            Ends::Write(writer) => Ok(writer),
            _ => Err(role_error("write", state)),
        }
    }

    /// Write one whole frame to the bound write end.
    ///
    /// Anything less than the full buffer reaching the pipe is a transport error; the stream is
    /// no longer frame-aligned after that.
    pub fn write_frame(&mut self, frame: &[u8]) -> BounceResult<()> {
        let Ends::Write(writer) = &mut self.ends else {
            return Err(BounceError::transport(format!(
                "frame written to a channel in state {:?}",
                self.state()
            )));
        };
        writer.write_all(frame).map_err(|e| {
            BounceError::transport(format!(
                "failed to write {}-byte frame to the encoder: {e}",
                frame.len()
            ))
        })
    }

    /// Close the bound end. Closing twice, or before binding a role, is an error.
    pub fn close(&mut self) -> BounceResult<()> {
        match std::mem::replace(&mut self.ends, Ends::Closed) {
            Ends::Read(reader) => drop(reader),
            Ends::Write(writer) => drop(writer),
            ends @ Ends::Created { .. } => {
                self.ends = ends;
                return Err(BounceError::channel("cannot close a channel with no role bound"));
            }
            Ends::Closed => {
                return Err(BounceError::channel("channel is already closed"));
            }
        }
        tracing::debug!("frame channel closed");
        Ok(())
    }
}

fn role_error(wanted: &str, state: ChannelState) -> BounceError {
    BounceError::channel(format!(
        "cannot bind the {wanted} role on a channel in state {state:?}"
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/channel.rs"]
mod tests;
