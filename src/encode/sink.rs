use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{BounceError, BounceResult};
use crate::raster::Raster;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame dimensions.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Exact size of every frame pushed to the sink.
    pub fn frame_bytes(&self) -> usize {
        self.canvas.frame_bytes()
    }
}

/// Sink contract for consuming rendered frames in tick order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, once
/// per tick, between one `begin` and one `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BounceResult<()>;
    /// Push one frame in strictly increasing tick order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> BounceResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BounceResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Vec<u8>)>,
    ended: usize,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured raw frames in tick order.
    pub fn frames(&self) -> &[(FrameIndex, Vec<u8>)] {
        &self.frames
    }

    /// How many times `end` was called.
    pub fn end_calls(&self) -> usize {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BounceResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> BounceResult<()> {
        if self.ended > 0 {
            return Err(BounceError::transport("frame pushed after end of stream"));
        }
        self.frames.push((idx, frame.raw_bytes().to_vec()));
        Ok(())
    }

    fn end(&mut self) -> BounceResult<()> {
        self.ended += 1;
        Ok(())
    }
}
