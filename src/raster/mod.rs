//! Fixed-size frame buffer of packed colors.

use crate::foundation::core::{Canvas, Color};
use crate::foundation::error::{BounceError, BounceResult};

/// Row-major grid of packed [`Color`] values with the origin at the top-left.
///
/// The buffer is allocated once and never resized. Out-of-bounds writes are ignored.
#[derive(Clone, Debug)]
pub struct Raster {
    canvas: Canvas,
    pixels: Vec<u32>,
}

impl Raster {
    /// Allocate a raster filled with transparent black.
    pub fn new(canvas: Canvas) -> BounceResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(BounceError::validation(
                "raster width/height must be non-zero",
            ));
        }
        if i32::try_from(canvas.width).is_err() || i32::try_from(canvas.height).is_err() {
            return Err(BounceError::validation(
                "raster width/height must fit in a signed 32-bit coordinate",
            ));
        }
        Ok(Self {
            canvas,
            pixels: vec![0; canvas.pixel_count()],
        })
    }

    /// Dimensions this raster was allocated with.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Overwrite every pixel with `background`.
    pub fn clear(&mut self, background: Color) {
        self.pixels.fill(background.0);
    }

    /// Write one pixel; coordinates outside the canvas are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.0;
        }
    }

    /// Read one pixel, `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color(self.pixels[i]))
    }

    /// The whole frame as tightly packed bytes, `width * height * 4` long.
    pub fn raw_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy out as straight-alpha RGBA8 bytes regardless of host endianness.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| Color(p).to_rgba())
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        Some(y as usize * self.canvas.width as usize + x as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/raster.rs"]
mod tests;
