// SPDX-License-Identifier: MIT
// CPU rescaler built on fast_image_resize (SIMD-accelerated).
// ARGB PixelBuffer in → new ARGB PixelBuffer out; the input is never modified.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{FilterType, ResizeAlg, ResizeOptions, Resizer};

use crate::ninepatch::BorderError;
use crate::pixels::{LengthMismatch, PixelBuffer};
use crate::presets::{build_plan, Size};

#[derive(Debug)]
pub enum ScaleError {
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
    Length(LengthMismatch),
    NinePatch(BorderError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }
impl From<LengthMismatch> for ScaleError { fn from(e: LengthMismatch) -> Self { Self::Length(e) } }
impl From<BorderError> for ScaleError { fn from(e: BorderError) -> Self { Self::NinePatch(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
            ScaleError::Length(e) => write!(f, "Pixel buffer error: {}", e),
            ScaleError::NinePatch(e) => write!(f, "Malformed 9-patch: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            ScaleError::Length(e) => Some(e),
            ScaleError::NinePatch(e) => Some(e),
        }
    }
}

/// Rescale `src` to `target_w × target_h`.
///
/// Zero dimensions are clamped to 1. Large downscales go through the halving chain from
/// [`build_plan`] before the final bilinear pass; each step replaces the previous buffer.
pub fn rescale(src: &PixelBuffer, target_w: u32, target_h: u32) -> Result<PixelBuffer, ScaleError> {
    let plan = build_plan(src.size(), Size::new(target_w, target_h));
    if plan.is_identity() {
        return Ok(src.clone());
    }

    let mut resizer = Resizer::new();
    let mut current: Option<PixelBuffer> = None;
    for step in &plan.halvings {
        let next = bilinear(&mut resizer, current.as_ref().unwrap_or(src), *step)?;
        current = Some(next);
    }
    bilinear(&mut resizer, current.as_ref().unwrap_or(src), plan.out)
}

/// Single bilinear pass over the full source extent onto the full target extent.
/// No halving; exposed so callers can compare against the staged path.
pub fn rescale_single_pass(src: &PixelBuffer, target_w: u32, target_h: u32) -> Result<PixelBuffer, ScaleError> {
    let out = Size::new(target_w, target_h).at_least_one();
    if out == src.size() {
        return Ok(src.clone());
    }
    bilinear(&mut Resizer::new(), src, out)
}

fn bilinear(resizer: &mut Resizer, src: &PixelBuffer, out: Size) -> Result<PixelBuffer, ScaleError> {
    if out == src.size() {
        return Ok(src.clone());
    }

    // --- Source view (tightly packed RGBA8) ---
    let src_bytes = src.to_rgba8();
    let src_view = TypedImageRef::<U8x4>::from_buffer(src.width(), src.height(), &src_bytes)?;

    // --- Destination canvas ---
    let mut dst_bytes = vec![0u8; out.w as usize * out.h as usize * 4];
    {
        let mut dst_image = TypedImage::<U8x4>::from_buffer(out.w, out.h, dst_bytes.as_mut_slice())?;

        // --- Resize ---
        // Alpha-aware so transparent pixels do not bleed their colour into edges.
        let opts = ResizeOptions::new()
            .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
            .use_alpha(true);
        resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &opts)?;
    }

    Ok(PixelBuffer::from_rgba8(out.w, out.h, &dst_bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = (x * 255 / (w - 1)) as u32;
                buf.set(x, y, 0xFF00_0000 | (v << 16) | (v << 8) | v);
            }
        }
        buf
    }

    #[test]
    fn identity_is_pixel_exact() {
        let src = gradient(17, 9);
        assert_eq!(rescale(&src, 17, 9).unwrap(), src);
    }

    #[test]
    fn zero_target_yields_one_pixel() {
        let src = gradient(40, 40);
        let out = rescale(&src, 0, 0).unwrap();
        assert_eq!(out.size(), Size::new(1, 1));
    }

    #[test]
    fn upscale_produces_target_size() {
        let src = gradient(10, 6);
        let out = rescale(&src, 15, 9).unwrap();
        assert_eq!(out.size(), Size::new(15, 9));
        assert!(out.pixels().iter().all(|&p| crate::pixels::alpha(p) >= 0xFE));
    }

    #[test]
    fn staged_downscale_tracks_single_pass() {
        let src = gradient(64, 64);
        let staged = rescale(&src, 16, 16).unwrap();
        let single = rescale_single_pass(&src, 16, 16).unwrap();
        assert_eq!(staged.size(), single.size());

        let max_diff = staged
            .to_rgba8()
            .iter()
            .zip(single.to_rgba8())
            .map(|(a, b)| (i16::from(*a) - i16::from(b)).abs())
            .max()
            .unwrap();
        assert!(max_diff <= 24, "staged result drifted by {max_diff}");
    }

    #[test]
    fn solid_colour_survives_downscale() {
        let src = PixelBuffer::filled(30, 30, 0xFF33_6699);
        let out = rescale(&src, 7, 7).unwrap();
        for channel in out.to_rgba8().chunks_exact(4) {
            for (got, want) in channel.iter().zip([0x33u8, 0x66, 0x99, 0xFF]) {
                assert!(got.abs_diff(want) <= 1, "channel {got:#x} vs {want:#x}");
            }
        }
    }
}
