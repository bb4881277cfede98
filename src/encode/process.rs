use crate::encode::channel::{ChannelState, FrameChannel};
use crate::foundation::error::{BounceError, BounceResult};
use std::io::Read as _;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

/// A spawned child process fed through a [`FrameChannel`] bound to its stdin.
///
/// Lifecycle: channel created, child spawned with a duplicate of the read end as stdin, write
/// role bound in the parent, frames written, write end closed, child reaped. Dropping the
/// supervisor before [`EncoderProcess::finish`] still closes the write end and waits for the
/// child.
pub struct EncoderProcess {
    program: String,
    channel: FrameChannel,
    child: Option<Child>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    frames_written: u64,
    bytes_written: u64,
}

impl std::fmt::Debug for EncoderProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderProcess")
            .field("program", &self.program)
            .field("channel", &self.channel)
            .field("pid", &self.child.as_ref().map(Child::id))
            .field("frames_written", &self.frames_written)
            .finish()
    }
}

impl EncoderProcess {
    /// Spawn `cmd` with its stdin wired to a fresh channel.
    ///
    /// Any stdin configuration already on `cmd` is replaced and stderr is captured. `cmd` is
    /// consumed so the parent's copy of the child's read end is released before any frame is
    /// written.
    pub fn spawn(mut cmd: Command) -> BounceResult<Self> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        let mut channel = FrameChannel::new()?;

        cmd.stdin(channel.child_stdin()?).stderr(Stdio::piped());
        let spawned = cmd.spawn();
        drop(cmd);
        let mut child = spawned.map_err(|e| {
            BounceError::spawn(format!(
                "failed to spawn '{program}' (is it installed and on PATH?): {e}"
            ))
        })?;

        channel.bind_write()?;

        let stderr_drain = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut stderr_bytes = Vec::new();
                stderr.read_to_end(&mut stderr_bytes)?;
                Ok(stderr_bytes)
            })
        });

        tracing::info!(program = %program, pid = child.id(), "encoder process spawned");
        Ok(Self {
            program,
            channel,
            child: Some(child),
            stderr_drain,
            frames_written: 0,
            bytes_written: 0,
        })
    }

    /// State of the parent's end of the channel.
    pub fn channel_state(&self) -> ChannelState {
        self.channel.state()
    }

    /// Frames fully delivered so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Bytes fully delivered so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Write one whole frame; may block while the child drains the pipe.
    ///
    /// On failure the stream is torn down immediately: the write end is closed, the child is
    /// reaped, and its exit status and stderr are folded into the returned transport error.
    pub fn write_frame(&mut self, frame: &[u8]) -> BounceResult<()> {
        if let Err(err) = self.channel.write_frame(frame) {
            let detail = match self.shutdown() {
                Ok((status, stderr)) => describe_exit(&self.program, status, &stderr),
                Err(e) => e.to_string(),
            };
            return Err(BounceError::transport(format!("{err}; {detail}")));
        }
        self.frames_written += 1;
        self.bytes_written += frame.len() as u64;
        Ok(())
    }

    /// Close the write end, wait for the child, and require a successful exit.
    pub fn finish(mut self) -> BounceResult<()> {
        let (status, stderr) = self.shutdown()?;
        if !status.success() {
            return Err(BounceError::encoder(describe_exit(
                &self.program,
                status,
                &stderr,
            )));
        }
        tracing::info!(
            program = %self.program,
            frames = self.frames_written,
            bytes = self.bytes_written,
            "encoder process finished"
        );
        Ok(())
    }

    fn shutdown(&mut self) -> BounceResult<(ExitStatus, Vec<u8>)> {
        if self.channel.state() == ChannelState::WriteBound {
            self.channel.close()?;
        }
        let mut child = self
            .child
            .take()
            .ok_or_else(|| BounceError::encoder("encoder process was already reaped"))?;

        let status = child.wait().map_err(|e| {
            BounceError::encoder(format!("failed to wait for '{}': {e}", self.program))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| BounceError::encoder("encoder stderr drain thread panicked"))?
                .map_err(|e| BounceError::encoder(format!("encoder stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        Ok((status, stderr_bytes))
    }
}

impl Drop for EncoderProcess {
    fn drop(&mut self) {
        if self.child.is_some()
            && let Err(err) = self.shutdown()
        {
            tracing::warn!(%err, "encoder process teardown failed");
        }
    }
}

fn describe_exit(program: &str, status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("'{program}' exited with status {status}")
    } else {
        format!("'{program}' exited with status {status}: {stderr}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/process.rs"]
mod tests;
