// SPDX-License-Identifier: MIT
//! # 9-Patch Border Processing
//!
//! A 9-patch image carries a 1-pixel frame around its content. Opaque black pixels on the top and
//! left edges mark the stretchable regions, those on the bottom and right edges mark the padding
//! box; everything else in the frame is fully transparent. The four corners carry no information.
//!
//! Scaling the whole image with a bilinear filter would smear the frame into the content and
//! produce grey, half-transparent markers. Instead the pipeline is:
//!
//! 1. **Trim** the frame off and rescale the content like any other image.
//! 2. **Extract** the four edge strips from the untouched source (corners excluded).
//! 3. **Validate** that every strip pixel is either transparent or exactly opaque black.
//! 4. **Resize** each strip along its free axis to the new content length:
//!    - growing: bilinear rescale, then snap every pixel back to black or transparent;
//!    - shrinking: map each marker to `floor(x * new_len / old_len)` so no marker is lost.
//! 5. **Recompose** a `(W+2) × (H+2)` canvas with the strips on the edges and the content inside.
//!
//! All four strips are validated before anything is resized, so a malformed image never produces
//! a partial result.

use crate::cpu::{rescale, ScaleError};
use crate::pixels::{alpha, PixelBuffer, OPAQUE_BLACK, TRANSPARENT};
use crate::presets::Size;

/// One edge of the 9-patch frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    fn is_vertical(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Why a 9-patch frame was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BorderError {
    /// The image cannot hold a frame plus at least one content pixel.
    TooSmall { size: Size },
    /// A frame pixel is neither transparent nor opaque black.
    InvalidPixel { edge: Edge, offset: u32, argb: u32 },
}

impl std::fmt::Display for BorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BorderError::TooSmall { size } => {
                write!(f, "image {} is too small to carry a 9-patch border", size)
            }
            BorderError::InvalidPixel { edge, offset, argb } => write!(
                f,
                "{} border pixel {} is {:#010x}, expected transparent or opaque black",
                edge, offset, argb
            ),
        }
    }
}

impl std::error::Error for BorderError {}

/// Single-pixel strip taken from one edge of the frame, corners excluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderStrip {
    pub edge: Edge,
    pub pixels: PixelBuffer,
}

impl BorderStrip {
    /// Length along the free axis.
    pub fn len(&self) -> u32 {
        if self.edge.is_vertical() {
            self.pixels.height()
        } else {
            self.pixels.width()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resize along the free axis to `target_len` pixels.
    pub fn resized(&self, target_len: u32) -> Result<BorderStrip, ScaleError> {
        let (w, h) = if self.edge.is_vertical() { (1, target_len) } else { (target_len, 1) };
        Ok(BorderStrip {
            edge: self.edge,
            pixels: resize_border(&self.pixels, w, h)?,
        })
    }
}

/// Whether a file name follows the `name.9.ext` convention.
pub fn is_nine_patch_name(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => !ext.is_empty() && stem.ends_with(".9"),
        None => false,
    }
}

/// Drop the outer 1-pixel ring.
pub fn trim_border(src: &PixelBuffer) -> Result<PixelBuffer, BorderError> {
    check_size(src)?;
    Ok(src.crop(1, 1, src.width() - 2, src.height() - 2))
}

/// Read one edge of the frame from the untrimmed source, corners excluded.
pub fn extract_strip(src: &PixelBuffer, edge: Edge) -> Result<BorderStrip, BorderError> {
    check_size(src)?;
    let (w, h) = (src.width(), src.height());
    let pixels = match edge {
        Edge::Left => src.crop(0, 1, 1, h - 2),
        Edge::Right => src.crop(w - 1, 1, 1, h - 2),
        Edge::Top => src.crop(1, 0, w - 2, 1),
        Edge::Bottom => src.crop(1, h - 1, w - 2, 1),
    };
    Ok(BorderStrip { edge, pixels })
}

/// Every pixel must be fully transparent or exactly opaque black.
pub fn verify_border(strip: &BorderStrip) -> Result<(), BorderError> {
    match strip
        .pixels
        .pixels()
        .iter()
        .position(|&p| alpha(p) != 0 && p != OPAQUE_BLACK)
    {
        Some(offset) => Err(BorderError::InvalidPixel {
            edge: strip.edge,
            offset: offset as u32,
            argb: strip.pixels.pixels()[offset],
        }),
        None => Ok(()),
    }
}

/// Snap interpolated pixels back to the two legal frame colours.
///
/// Strip endpoints are snapped like any other pixel and deliberately not cleared; the frame
/// corners come out transparent from [`recompose`] instead.
pub fn enforce_border_colors(mut border: PixelBuffer) -> PixelBuffer {
    for p in border.pixels_mut() {
        *p = if alpha(*p) != 0 { OPAQUE_BLACK } else { TRANSPARENT };
    }
    border
}

/// Resize a frame strip to `target_w × target_h`.
///
/// Growing on either axis goes through the bilinear rescaler followed by
/// [`enforce_border_colors`]. Otherwise every opaque source pixel is mapped to its proportional
/// destination; collisions simply overwrite.
pub fn resize_border(border: &PixelBuffer, target_w: u32, target_h: u32) -> Result<PixelBuffer, ScaleError> {
    let (w, h) = (border.width(), border.height());
    if target_w > w || target_h > h {
        return Ok(enforce_border_colors(rescale(border, target_w, target_h)?));
    }

    let mut out = PixelBuffer::new(target_w, target_h);
    if target_w == 0 || target_h == 0 {
        return Ok(out);
    }
    let width_ratio = target_w as f32 / w as f32;
    let height_ratio = target_h as f32 / h as f32;
    for y in 0..h {
        for x in 0..w {
            if alpha(border.get(x, y)) != 0 {
                let new_x = ((x as f32 * width_ratio) as u32).min(target_w - 1);
                let new_y = ((y as f32 * height_ratio) as u32).min(target_h - 1);
                out.set(new_x, new_y, OPAQUE_BLACK);
            }
        }
    }
    Ok(out)
}

/// Assemble the final image: resized strips on the edges, `content` at `(1, 1)`.
///
/// Each strip must already match the content length on its free axis.
pub fn recompose(content: &PixelBuffer, strips: &[BorderStrip]) -> PixelBuffer {
    let (w, h) = (content.width(), content.height());
    let mut out = PixelBuffer::new(w + 2, h + 2);
    for strip in strips {
        let (x, y) = match strip.edge {
            Edge::Left => (0, 1),
            Edge::Right => (w + 1, 1),
            Edge::Top => (1, 0),
            Edge::Bottom => (1, h + 1),
        };
        out.blit(&strip.pixels, x, y);
    }
    out.blit(content, 1, 1);
    out
}

/// Full pipeline: rescale a 9-patch image by `ratio`, keeping its frame crisp.
pub fn scale_nine_patch(src: &PixelBuffer, ratio: f32) -> Result<PixelBuffer, ScaleError> {
    let strips = Edge::ALL
        .iter()
        .map(|&edge| {
            let strip = extract_strip(src, edge)?;
            verify_border(&strip)?;
            Ok(strip)
        })
        .collect::<Result<Vec<_>, BorderError>>()?;

    let trimmed = trim_border(src)?;
    let target = trimmed.size().scaled(ratio);
    let content = rescale(&trimmed, target.w, target.h)?;

    let resized = strips
        .iter()
        .map(|strip| {
            let len = if strip.edge.is_vertical() { content.height() } else { content.width() };
            strip.resized(len)
        })
        .collect::<Result<Vec<_>, ScaleError>>()?;

    Ok(recompose(&content, &resized))
}

fn check_size(src: &PixelBuffer) -> Result<(), BorderError> {
    if src.width() < 3 || src.height() < 3 {
        return Err(BorderError::TooSmall { size: src.size() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: u32 = 0xFF4C_AF50;

    /// 10×10 image: solid content, markers on every edge, transparent corners.
    fn sample() -> PixelBuffer {
        let mut img = PixelBuffer::new(10, 10);
        for y in 1..9 {
            for x in 1..9 {
                img.set(x, y, CONTENT);
            }
        }
        for i in [3, 4, 5] {
            img.set(i, 0, OPAQUE_BLACK);
            img.set(0, i, OPAQUE_BLACK);
        }
        for i in 2..8 {
            img.set(i, 9, OPAQUE_BLACK);
            img.set(9, i, OPAQUE_BLACK);
        }
        img
    }

    fn opaque_positions(buf: &PixelBuffer) -> Vec<usize> {
        buf.pixels()
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == OPAQUE_BLACK)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn detects_nine_patch_names() {
        assert!(is_nine_patch_name("button.9.png"));
        assert!(is_nine_patch_name("bg.9.webp"));
        assert!(!is_nine_patch_name("icon.png"));
        assert!(!is_nine_patch_name("v1.9png"));
        assert!(!is_nine_patch_name("file.9."));
    }

    #[test]
    fn trim_drops_outer_ring() {
        let trimmed = trim_border(&sample()).unwrap();
        assert_eq!(trimmed.size(), Size::new(8, 8));
        assert!(trimmed.pixels().iter().all(|&p| p == CONTENT));
    }

    #[test]
    fn strips_exclude_corners() {
        let src = sample();
        let top = extract_strip(&src, Edge::Top).unwrap();
        assert_eq!(top.pixels.size(), Size::new(8, 1));
        assert_eq!(opaque_positions(&top.pixels), vec![2, 3, 4]);

        let left = extract_strip(&src, Edge::Left).unwrap();
        assert_eq!(left.pixels.size(), Size::new(1, 8));
        assert_eq!(left.len(), 8);
    }

    #[test]
    fn rejects_semi_transparent_marker() {
        let mut src = sample();
        src.set(0, 4, 0x80000000);
        let strip = extract_strip(&src, Edge::Left).unwrap();
        assert_eq!(
            verify_border(&strip),
            Err(BorderError::InvalidPixel { edge: Edge::Left, offset: 3, argb: 0x80000000 })
        );
    }

    #[test]
    fn rejects_coloured_marker() {
        let mut src = sample();
        src.set(5, 9, 0xFFFF0000);
        assert!(matches!(
            scale_nine_patch(&src, 1.5),
            Err(ScaleError::NinePatch(BorderError::InvalidPixel { edge: Edge::Bottom, .. }))
        ));
    }

    #[test]
    fn rejects_tiny_images() {
        let src = PixelBuffer::new(2, 5);
        assert_eq!(trim_border(&src), Err(BorderError::TooSmall { size: Size::new(2, 5) }));
    }

    #[test]
    fn shrink_keeps_every_marker() {
        let mut strip = PixelBuffer::new(10, 1);
        strip.set(2, 0, OPAQUE_BLACK);
        strip.set(7, 0, OPAQUE_BLACK);
        let out = resize_border(&strip, 5, 1).unwrap();
        assert_eq!(opaque_positions(&out), vec![1, 3]);
    }

    #[test]
    fn shrink_maps_tail_marker_to_last_slot() {
        let mut strip = PixelBuffer::new(1, 3);
        strip.set(0, 2, OPAQUE_BLACK);
        let out = resize_border(&strip, 1, 2).unwrap();
        assert_eq!(opaque_positions(&out), vec![1]);
    }

    #[test]
    fn grow_is_binary() {
        let mut strip = PixelBuffer::new(8, 1);
        for x in 3..6 {
            strip.set(x, 0, OPAQUE_BLACK);
        }
        let out = resize_border(&strip, 16, 1).unwrap();
        assert_eq!(out.size(), Size::new(16, 1));
        assert!(out.pixels().iter().all(|&p| p == OPAQUE_BLACK || p == TRANSPARENT));
        assert!(out.pixels().iter().any(|&p| p == OPAQUE_BLACK));
        assert_eq!(out.get(0, 0), TRANSPARENT);
        assert_eq!(out.get(15, 0), TRANSPARENT);
    }

    #[test]
    fn enforce_border_colors_binarizes() {
        let buf = PixelBuffer::from_pixels(4, 1, vec![0x01FFFFFF, 0x00123456, 0xFF000000, 0x7F7F7F7F]).unwrap();
        let out = enforce_border_colors(buf);
        assert_eq!(out.pixels(), &[OPAQUE_BLACK, TRANSPARENT, OPAQUE_BLACK, OPAQUE_BLACK]);
    }

    #[test]
    fn round_trip_at_unit_ratio() {
        let src = sample();
        let out = scale_nine_patch(&src, 1.0).unwrap();
        assert_eq!(out, src);
        for (x, y) in [(0, 0), (9, 0), (0, 9), (9, 9)] {
            assert_eq!(out.get(x, y), TRANSPARENT);
        }
    }

    #[test]
    fn scaled_output_has_frame_around_content() {
        let out = scale_nine_patch(&sample(), 1.5).unwrap();
        assert_eq!(out.size(), Size::new(14, 14));
        for (x, y) in [(0, 0), (13, 0), (0, 13), (13, 13)] {
            assert_eq!(out.get(x, y), TRANSPARENT);
        }
        for x in 1..13 {
            let p = out.get(x, 0);
            assert!(p == OPAQUE_BLACK || p == TRANSPARENT);
        }
    }

    #[test]
    fn downscaled_output_keeps_markers() {
        let out = scale_nine_patch(&sample(), 0.5).unwrap();
        assert_eq!(out.size(), Size::new(6, 6));
        let top = out.crop(1, 0, 4, 1);
        assert_eq!(opaque_positions(&top), vec![1, 2]);
    }
}
