use crate::foundation::core::{Canvas, Color, Fps};
use crate::foundation::error::{BounceError, BounceResult};
use crate::scene::shape::ShapeKind;
use std::path::Path;

/// Half-open integer range `[min, max)` used for randomized shape attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IRange {
    /// Inclusive lower bound.
    pub min: i32,
    /// Exclusive upper bound.
    pub max: i32,
}

impl IRange {
    /// Build a range; inverted bounds are tolerated and swapped when sampled.
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// How shapes evolve from one tick to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// Shapes are created once and tracked for the whole run.
    Persistent,
    /// Every shape is replaced by a freshly randomized one right after it is rendered.
    #[default]
    Respawn,
}

/// Scene description: canvas, timing, and how shapes are seeded and advanced.
///
/// Defaults reproduce the reference run: an 800x800 canvas at 10 fps for 10 seconds with one
/// respawning disc and no background clear.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Output dimensions.
    pub canvas: Canvas,
    /// Output frame rate; one tick per frame.
    pub fps: Fps,
    /// Run length in whole seconds.
    pub duration_secs: u32,
    /// Fill predicate for every shape.
    pub shape: ShapeKind,
    /// Number of shapes in the scene.
    pub shape_count: usize,
    /// Whether shapes persist or respawn every tick.
    pub spawn: SpawnMode,
    /// Enable the O(n^2) pairwise velocity exchange each tick.
    pub pairwise_collisions: bool,
    /// Color each frame is cleared to; `None` leaves previous frames as trails.
    pub background: Option<Color>,
    /// Seed for shape placement and respawns.
    pub seed: u64,
    /// Range for each velocity component.
    pub velocity: IRange,
    /// Range for shape size.
    pub size: IRange,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 800,
                height: 800,
            },
            fps: Fps { num: 10, den: 1 },
            duration_secs: 10,
            shape: ShapeKind::Disc,
            shape_count: 1,
            spawn: SpawnMode::Respawn,
            pairwise_collisions: false,
            background: None,
            seed: 1,
            velocity: IRange::new(-10, 10),
            size: IRange::new(20, 30),
        }
    }
}

impl SceneConfig {
    /// Load a JSON scene file; absent fields take their defaults.
    pub fn from_path(path: &Path) -> BounceResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read scene config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes).map_err(|e| {
            BounceError::serde(format!("invalid scene config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the raster or encoder cannot honor.
    pub fn validate(&self) -> BounceResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BounceError::validation("canvas width/height must be non-zero"));
        }
        if i32::try_from(self.canvas.width).is_err() || i32::try_from(self.canvas.height).is_err()
        {
            return Err(BounceError::validation("canvas width/height are too large"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(BounceError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.size.min.max(self.size.max) <= 0 {
            return Err(BounceError::validation(
                "shape size range must contain a positive value",
            ));
        }
        Ok(())
    }

    /// Total ticks for the run: `fps * duration_secs`.
    pub fn tick_count(&self) -> u64 {
        self.fps.frames_in_secs(self.duration_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
