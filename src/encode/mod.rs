//! Frame transport: the pipe channel, the encoder process supervisor, and frame sinks.
//!
//! Sinks consume rendered frames in tick order and are driven by `Simulation::run`.

/// Unidirectional pipe with an explicit role lifecycle.
pub mod channel;
/// `ffmpeg`-based sink (video output via the system `ffmpeg`).
pub mod ffmpeg;
/// Child-process supervision around a [`channel::FrameChannel`].
pub mod process;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
