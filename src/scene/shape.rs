use crate::foundation::core::{Canvas, Color, IVec2};
use crate::foundation::error::{BounceError, BounceResult};
use crate::foundation::random::BoundedRng;
use crate::raster::Raster;
use crate::scene::config::IRange;

/// Fill predicate selecting how a [`Shape`] covers pixels around its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Axis-aligned filled square of side `2 * size`.
    Square,
    /// Filled disc of radius `size`.
    #[default]
    Disc,
}

impl ShapeKind {
    /// Whether the pixel at offset `(dx, dy)` from the center belongs to the shape.
    ///
    /// Offsets are already restricted to the `[-size, size)` bounding box.
    #[inline]
    fn covers(self, dx: i64, dy: i64, size: i64) -> bool {
        match self {
            Self::Square => true,
            Self::Disc => dx * dx + dy * dy < size * size,
        }
    }
}

/// A moving shape bouncing inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    /// Fill predicate.
    pub kind: ShapeKind,
    /// Center position in pixels.
    pub position: IVec2,
    /// Displacement applied each tick.
    pub velocity: IVec2,
    /// Half-extent (square) or radius (disc), always > 0.
    pub size: i32,
    /// Fill color.
    pub color: Color,
}

impl Shape {
    /// Build a shape, rejecting non-positive sizes.
    pub fn new(
        kind: ShapeKind,
        position: IVec2,
        velocity: IVec2,
        size: i32,
        color: Color,
    ) -> BounceResult<Self> {
        if size <= 0 {
            return Err(BounceError::validation(format!(
                "shape size must be > 0 (got {size})"
            )));
        }
        Ok(Self {
            kind,
            position,
            velocity,
            size,
            color,
        })
    }

    /// Fresh shape with random position, velocity, size and color.
    ///
    /// Position is drawn from the whole canvas; the first `update` clamps it inside.
    pub fn random(
        kind: ShapeKind,
        canvas: Canvas,
        velocity: IRange,
        size: IRange,
        rng: &mut BoundedRng,
    ) -> Self {
        let position = IVec2::new(
            rng.range(0, canvas.width_i32()),
            rng.range(0, canvas.height_i32()),
        );
        let velocity = IVec2::new(
            rng.range(velocity.min, velocity.max),
            rng.range(velocity.min, velocity.max),
        );
        let size = rng.range(size.min, size.max).max(1);
        let color = Color::from_rgba(rng.byte(), rng.byte(), rng.byte(), rng.byte());
        Self {
            kind,
            position,
            velocity,
            size,
            color,
        }
    }

    /// Move by one velocity step, then clamp each axis into `[size, dim - size]`.
    pub fn update(&mut self, canvas: Canvas) {
        self.position += self.velocity;
        self.position.x = clamp_axis(self.position.x, self.size, canvas.width_i32());
        self.position.y = clamp_axis(self.position.y, self.size, canvas.height_i32());
    }

    /// Fill the shape's pixels into `raster`.
    ///
    /// Only the part of the bounding box that lies on the canvas is visited, so the cost is
    /// bounded by the canvas area whatever the size.
    pub fn render(&self, raster: &mut Raster) {
        let canvas = raster.canvas();
        let size = i64::from(self.size);
        let (cx, cy) = (i64::from(self.position.x), i64::from(self.position.y));
        let xs = visible_span(cx, size, canvas.width);
        let ys = visible_span(cy, size, canvas.height);
        for y in ys {
            for x in xs.clone() {
                if self.kind.covers(cx - x, cy - y, size) {
                    // Spans are clipped to the canvas, which fits in i32.
                    let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) else {
                        continue;
                    };
                    raster.set_pixel(px, py, self.color);
                }
            }
        }
    }

    /// Reflect velocity on every axis where the position sits on or past a wall.
    ///
    /// Driven by position only: a shape resting on a wall flips every tick. `i32::MIN`
    /// reflects to `i32::MAX`.
    pub fn handle_collision(&mut self, canvas: Canvas) {
        if at_wall(self.position.x, self.size, canvas.width_i32()) {
            self.velocity.x = self.velocity.x.saturating_neg();
        }
        if at_wall(self.position.y, self.size, canvas.height_i32()) {
            self.velocity.y = self.velocity.y.saturating_neg();
        }
    }
}

// Not `i32::clamp`: the bounds cross when a shape is wider than the canvas.
fn clamp_axis(v: i32, size: i32, dim: i32) -> i32 {
    v.min(dim - size).max(size)
}

/// Half-open range of box coordinates `[c - size, c + size)` that land on `[0, dim)`.
fn visible_span(c: i64, size: i64, dim: u32) -> std::ops::Range<i64> {
    (c - size).max(0)..(c + size).min(i64::from(dim))
}

fn at_wall(v: i32, size: i32, dim: i32) -> bool {
    v <= size || v >= dim - size
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shape.rs"]
mod tests;
