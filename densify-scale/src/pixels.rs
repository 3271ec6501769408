// SPDX-License-Identifier: MIT
//! # ARGB Pixel Buffers
//!
//! [`PixelBuffer`] is the raster type every stage of the scaler works on: a tightly packed,
//! row-major grid of ARGB32 words (`0xAARRGGBB`). There is no stride and no padding, so
//! `pixels.len() == width * height` always holds.
//!
//! `fast_image_resize` and the `image` codecs both speak RGBA8 bytes, so the buffer also
//! knows how to convert itself to and from that layout.

use crate::presets::Size;

/// Fully transparent pixel.
pub const TRANSPARENT: u32 = 0x0000_0000;
/// Opaque black, the only colour allowed as a 9-patch stretch marker.
pub const OPAQUE_BLACK: u32 = 0xFF00_0000;

/// Alpha byte of an ARGB32 pixel.
#[inline]
pub fn alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

/// Error returned when raw pixel data does not match the declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl std::fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pixel data has {} entries, expected {}", self.actual, self.expected)
    }
}

impl std::error::Error for LengthMismatch {}

/// Row-major ARGB32 raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Allocate a buffer where every pixel is `argb`.
    pub fn filled(width: u32, height: u32, argb: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![argb; width as usize * height as usize],
        }
    }

    /// Wrap existing ARGB data. Fails if the length is not `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, LengthMismatch> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(LengthMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Build from tightly packed RGBA8 bytes (the layout `image::RgbaImage` stores).
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, LengthMismatch> {
        let expected = width as usize * height as usize;
        if rgba.len() != expected * 4 {
            return Err(LengthMismatch { expected, actual: rgba.len() / 4 });
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| u32::from_be_bytes([p[3], p[0], p[1], p[2]]))
            .collect();
        Ok(Self { width, height, pixels })
    }

    /// Serialize to tightly packed RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &argb in &self.pixels {
            let [a, r, g, b] = argb.to_be_bytes();
            out.extend_from_slice(&[r, g, b, a]);
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size { w: self.width, h: self.height }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, argb: u32) {
        let i = self.index(x, y);
        self.pixels[i] = argb;
    }

    /// Copy a `w × h` rectangle starting at `(x, y)` into a new buffer.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> PixelBuffer {
        assert!(x + w <= self.width && y + h <= self.height, "crop out of bounds");
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for row in y..y + h {
            let start = self.index(x, row);
            out.extend_from_slice(&self.pixels[start..start + w as usize]);
        }
        PixelBuffer { width: w, height: h, pixels: out }
    }

    /// Paste `src` with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        assert!(
            x + src.width <= self.width && y + src.height <= self.height,
            "blit out of bounds"
        );
        for row in 0..src.height {
            let s = (row * src.width) as usize;
            let d = self.index(x, y + row);
            self.pixels[d..d + src.width as usize]
                .copy_from_slice(&src.pixels[s..s + src.width as usize]);
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}
