use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Seeded integer generator for scene setup and respawns.
///
/// Ranges are half-open: `[min, max)`. Inverted bounds are swapped after logging a warning,
/// and an empty range yields `min`.
#[derive(Clone, Debug)]
pub struct BoundedRng {
    rng: SmallRng,
}

impl BoundedRng {
    /// Deterministic generator for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max)`.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        let (min, max) = if max < min {
            tracing::warn!(min, max, "random range bounds are out of order; swapping");
            (max, min)
        } else {
            (min, max)
        };
        if min == max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// One uniformly random byte.
    pub fn byte(&mut self) -> u8 {
        self.rng.r#gen()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
