use crate::foundation::error::{BounceError, BounceResult};
use std::ops::{Add, AddAssign};

/// Absolute 0-based frame index; one frame is produced per simulation tick.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> BounceResult<Self> {
        if den == 0 {
            return Err(BounceError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(BounceError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames in one second, rounded up and never zero (`30000/1001` gives 30).
    pub fn frames_per_sec_ceil(self) -> u64 {
        u64::from(self.num.div_ceil(self.den.max(1)).max(1))
    }

    /// Whole frames per second, `num/1`.
    pub fn integer(num: u32) -> BounceResult<Self> {
        Self::new(num, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Number of ticks in `secs` seconds of output, floored.
    ///
    /// Integer arithmetic so whole-second durations never lose a frame to rounding.
    pub fn frames_in_secs(self, secs: u32) -> u64 {
        if self.den == 0 {
            return 0;
        }
        u64::from(secs) * u64::from(self.num) / u64::from(self.den)
    }

    /// Value for the encoder `-r` flag.
    pub fn to_arg(self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of pixels in one frame.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one raw frame on the wire (`width * height * 4`).
    pub fn frame_bytes(self) -> usize {
        self.pixel_count() * 4
    }

    /// Resolution string understood by the encoder, e.g. `800x600`.
    pub fn resolution(self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Width as a signed coordinate bound.
    pub fn width_i32(self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    /// Height as a signed coordinate bound.
    pub fn height_i32(self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

/// Signed 2D integer vector used for positions and velocities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IVec2 {
    /// Horizontal component, growing to the right.
    pub x: i32,
    /// Vertical component, growing downwards.
    pub y: i32,
}

impl IVec2 {
    /// Build a vector from components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IVec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for IVec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Packed 32-bit RGBA color: R in bits 0-7, G in 8-15, B in 16-23, A in 24-31.
///
/// On a little-endian host the in-memory byte order is R,G,B,A, which is exactly the `rgba`
/// raw pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color(pub u32);

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgba(0, 0, 0, 255);

    /// Raw pixel format name matching the in-memory layout of packed colors on this host.
    pub const RAW_PIX_FMT: &'static str = if cfg!(target_endian = "little") {
        "rgba"
    } else {
        "abgr"
    };

    /// Pack four channel bytes.
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32))
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        self.0 as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Alpha channel.
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Unpack into `[r, g, b, a]`.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

impl From<[u8; 4]> for Color {
    fn from(v: [u8; 4]) -> Self {
        Self::from_rgba(v[0], v[1], v[2], v[3])
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        c.to_rgba()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
