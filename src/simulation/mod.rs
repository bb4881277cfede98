//! Tick-driven simulation that owns the shapes and the shared raster.

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BounceError, BounceResult};
use crate::foundation::random::BoundedRng;
use crate::raster::Raster;
use crate::scene::collision::resolve_pairs;
use crate::scene::config::{SceneConfig, SpawnMode};
use crate::scene::shape::Shape;

/// Summary of a completed [`Simulation::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames delivered to the sink.
    pub frames: u64,
    /// Raw bytes delivered to the sink.
    pub bytes: u64,
    /// Velocity-axis swaps made by the pairwise pass over the whole run.
    pub pair_swaps: u64,
}

/// Scene state advanced one discrete tick at a time.
#[derive(Debug)]
pub struct Simulation {
    cfg: SceneConfig,
    raster: Raster,
    shapes: Vec<Shape>,
    rng: BoundedRng,
    ticks: u64,
    pair_swaps: u64,
}

impl Simulation {
    /// Validate `cfg` and seed `cfg.shape_count` random shapes.
    pub fn new(cfg: SceneConfig) -> BounceResult<Self> {
        cfg.validate()?;
        let mut rng = BoundedRng::seeded(cfg.seed);
        let shapes = (0..cfg.shape_count)
            .map(|_| Shape::random(cfg.shape, cfg.canvas, cfg.velocity, cfg.size, &mut rng))
            .collect();
        Self::assemble(cfg, shapes, rng)
    }

    /// Validate `cfg` and use the given shapes instead of random ones.
    ///
    /// Respawns (if enabled) still draw from `cfg.seed`.
    pub fn with_shapes(cfg: SceneConfig, shapes: Vec<Shape>) -> BounceResult<Self> {
        cfg.validate()?;
        if let Some(bad) = shapes.iter().find(|s| s.size <= 0) {
            return Err(BounceError::validation(format!(
                "shape size must be > 0 (got {})",
                bad.size
            )));
        }
        let rng = BoundedRng::seeded(cfg.seed);
        Self::assemble(cfg, shapes, rng)
    }

    fn assemble(cfg: SceneConfig, shapes: Vec<Shape>, rng: BoundedRng) -> BounceResult<Self> {
        let mut raster = Raster::new(cfg.canvas)?;
        if let Some(bg) = cfg.background {
            raster.clear(bg);
        }
        Ok(Self {
            cfg,
            raster,
            shapes,
            rng,
            ticks: 0,
            pair_swaps: 0,
        })
    }

    /// Scene configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.cfg
    }

    /// Current shapes.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The frame produced by the most recent tick.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Ticks advanced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the scene by one tick and render it into the raster.
    ///
    /// Per shape: move and clamp, render, respawn (in respawn mode), then reflect off walls.
    /// The optional pairwise pass runs after every shape has been handled.
    pub fn step(&mut self) {
        let canvas = self.cfg.canvas;
        if let Some(bg) = self.cfg.background {
            self.raster.clear(bg);
        }

        for shape in &mut self.shapes {
            shape.update(canvas);
            shape.render(&mut self.raster);
            if self.cfg.spawn == SpawnMode::Respawn {
                *shape = Shape::random(
                    self.cfg.shape,
                    canvas,
                    self.cfg.velocity,
                    self.cfg.size,
                    &mut self.rng,
                );
            }
            shape.handle_collision(canvas);
        }

        if self.cfg.pairwise_collisions {
            self.pair_swaps += resolve_pairs(&mut self.shapes) as u64;
        }
        self.ticks += 1;
    }

    /// Advance until `frame` has been rendered (frame `n` is the state after `n + 1` ticks).
    pub fn advance_to(&mut self, frame: FrameIndex) -> BounceResult<&Raster> {
        if self.ticks > frame.0.saturating_add(1) {
            return Err(BounceError::validation(format!(
                "frame {} is already behind the simulation (at tick {})",
                frame.0, self.ticks
            )));
        }
        while self.ticks <= frame.0 {
            self.step();
        }
        Ok(&self.raster)
    }

    /// Run `fps * duration_secs` ticks, pushing one frame per tick into `sink`.
    ///
    /// `end` is called exactly once after the last frame. A sink error aborts the run at once
    /// and is returned without calling `end`.
    #[tracing::instrument(skip(self, sink), fields(ticks = self.cfg.tick_count()))]
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> BounceResult<RunStats> {
        let cfg = SinkConfig {
            canvas: self.cfg.canvas,
            fps: self.cfg.fps,
        };
        let total = self.cfg.tick_count();
        let frame_bytes = cfg.frame_bytes() as u64;
        let swaps_before = self.pair_swaps;
        let frames_per_sec = self.cfg.fps.frames_per_sec_ceil();

        sink.begin(cfg)?;
        for i in 0..total {
            self.step();
            sink.push_frame(FrameIndex(i), &self.raster)?;
            if (i + 1) % frames_per_sec == 0 {
                tracing::debug!(frame = i, "frames streamed");
            }
        }
        sink.end()?;

        let stats = RunStats {
            frames: total,
            bytes: total * frame_bytes,
            pair_swaps: self.pair_swaps - swaps_before,
        };
        tracing::info!(
            frames = stats.frames,
            bytes = stats.bytes,
            pair_swaps = stats.pair_swaps,
            "run complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/simulation/simulation.rs"]
mod tests;
