// SPDX-License-Identifier: MIT
//! # densify-scale: Density Variant Scaling
//!
//! This crate turns one in-memory raster into the resized raster for another screen density.
//! It is pure: no files, no threads, no shared state. Everything here can run concurrently on
//! independent buffers.
//!
//! ## Key Components
//!
//! - [`pixels`]: the ARGB32 [`pixels::PixelBuffer`] every stage consumes and produces
//! - [`presets`]: scale plans, including the staged-halving chain for large downscales
//! - [`cpu`]: the rescaler, built on `fast_image_resize` bilinear convolution
//! - [`ninepatch`]: frame extraction, validation, resizing and recomposition for `.9` images
//!
//! ## Staged Downscaling
//!
//! A single bilinear pass cannot shrink an image by more than half without skipping source
//! pixels. [`cpu::rescale`] halves the working buffer until the remaining step is at most 2×,
//! then resamples to the exact target. See [`presets::halving_steps`].
//!
//! ## Usage Example
//!
//! ```rust
//! use densify_scale::{cpu::rescale, ninepatch::scale_nine_patch, pixels::PixelBuffer};
//!
//! let icon = PixelBuffer::filled(48, 48, 0xFF21_96F3);
//! let hdpi = rescale(&icon, 72, 72)?;
//! assert_eq!((hdpi.width(), hdpi.height()), (72, 72));
//!
//! // A 9-patch frame with no markers is still a valid frame.
//! let mut button = PixelBuffer::filled(12, 12, 0xFFFF_FFFF);
//! for i in 0..12 {
//!     for (x, y) in [(i, 0), (i, 11), (0, i), (11, i)] {
//!         button.set(x, y, 0);
//!     }
//! }
//! let scaled = scale_nine_patch(&button, 2.0)?;
//! assert_eq!((scaled.width(), scaled.height()), (22, 22));
//! # Ok::<(), densify_scale::cpu::ScaleError>(())
//! ```

pub mod cpu;
pub mod ninepatch;
pub mod pixels;
pub mod presets;

pub use cpu::{rescale, ScaleError};
pub use pixels::PixelBuffer;
pub use presets::Size;
