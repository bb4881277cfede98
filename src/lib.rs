//! bouncefx renders shapes bouncing around a fixed canvas and streams every frame, as raw
//! packed RGBA, into an external encoder process.
//!
//! - Describe the scene with a [`SceneConfig`]
//! - Create a [`Simulation`]
//! - Run it into a [`FrameSink`], typically an [`EncoderSink`] that feeds `ffmpeg` through a
//!   [`FrameChannel`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame transport: pipe channel, encoder process, and sinks.
pub mod encode;
/// Fixed-size frame buffer.
pub mod raster;
/// Shapes, collisions, and scene configuration.
pub mod scene;
/// Tick loop driving shapes into a sink.
pub mod simulation;

pub use crate::foundation::core::{Canvas, Color, Fps, FrameIndex, IVec2};
pub use crate::foundation::error::{BounceError, BounceResult};
pub use crate::foundation::random::BoundedRng;

pub use crate::encode::channel::{ChannelState, FrameChannel};
pub use crate::encode::ffmpeg::{
    EncoderOpts, EncoderSink, encoder_args, ensure_parent_dir, is_encoder_on_path,
    is_ffmpeg_on_path,
};
pub use crate::encode::process::EncoderProcess;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::raster::Raster;
pub use crate::scene::collision::resolve_pairs;
pub use crate::scene::config::{IRange, SceneConfig, SpawnMode};
pub use crate::scene::shape::{Shape, ShapeKind};
pub use crate::simulation::{RunStats, Simulation};
