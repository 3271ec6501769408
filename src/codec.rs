//! # Codec and Filesystem Glue
//!
//! Everything in a job that touches shared state goes through this module, which owns the two
//! global serialization points:
//!
//! - [`CODEC_LOCK`] wraps reading a source and writing (or copying) every output. The codec is
//!   not assumed to be re-entrant across concurrent calls.
//! - [`FOLDER_LOCK`] wraps the `exists → create` check on output folders, so two jobs sharing a
//!   parent directory never race to create `drawable-<name>`.
//!
//! The locks are independent of each other, and neither is held while pixels are being scaled.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use densify_scale::PixelBuffer;
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};

use crate::density::Density;
use crate::error::{ConvertError, ConvertResult};

/// Serializes decode, encode and copy.
pub static CODEC_LOCK: Mutex<()> = Mutex::new(());

/// Serializes output folder creation.
pub static FOLDER_LOCK: Mutex<()> = Mutex::new(());

// A panic while holding either lock leaves no partial state behind the `()`, so poisoning is
// ignored.
fn acquire(lock: &'static Mutex<()>) -> MutexGuard<'static, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decode `path` into an ARGB buffer.
pub fn decode(path: &Path) -> ConvertResult<PixelBuffer> {
    let image = {
        let _guard = acquire(&CODEC_LOCK);
        image::open(path).map_err(|source| ConvertError::Decode {
            path: path.to_path_buf(),
            source,
        })?
    };
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    // Dimensions come from the decoder, so the lengths always agree.
    PixelBuffer::from_rgba8(w, h, rgba.as_raw()).map_err(|e| ConvertError::Decode {
        path: path.to_path_buf(),
        source: parameter_error(ParameterErrorKind::Generic(e.to_string())),
    })
}

/// Encode `buffer` to `path`, picking the format from the extension and overwriting any file
/// already there.
pub fn encode(buffer: &PixelBuffer, path: &Path) -> ConvertResult<()> {
    let encode_error = |source| ConvertError::Encode {
        path: path.to_path_buf(),
        source,
    };
    let format = ImageFormat::from_path(path).map_err(encode_error)?;
    let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.to_rgba8())
        .ok_or_else(|| encode_error(parameter_error(ParameterErrorKind::DimensionMismatch)))?;
    let image = match format {
        // No alpha channel in JPEG.
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };

    let _guard = acquire(&CODEC_LOCK);
    image.save_with_format(path, format).map_err(encode_error)
}

/// Byte-for-byte copy of the source, used for the identity density.
pub fn copy_verbatim(source: &Path, target: &Path) -> ConvertResult<()> {
    let _guard = acquire(&CODEC_LOCK);
    fs::copy(source, target)
        .map(|_| ())
        .map_err(|e| ConvertError::io("copy", target, e))
}

/// Delete a previous run's output at `target`. A missing file is not an error.
pub fn remove_output(target: &Path) -> ConvertResult<()> {
    let _guard = acquire(&CODEC_LOCK);
    match fs::remove_file(target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConvertError::io("delete", target, e)),
    }
}

/// Make sure `drawable-<density>` exists next to `source` and return its path.
pub fn ensure_output_dir(source: &Path, density: &Density) -> ConvertResult<PathBuf> {
    let dir = output_dir(source, density);
    let _guard = acquire(&FOLDER_LOCK);
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| ConvertError::io("create folder", &dir, e))?;
    }
    Ok(dir)
}

fn parameter_error(kind: ParameterErrorKind) -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(kind))
}

/// Sibling folder for `density`.
pub fn output_dir(source: &Path, density: &Density) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(density.folder_name())
}

/// Where the `density` variant of `source` lands.
pub fn output_path(source: &Path, density: &Density) -> ConvertResult<PathBuf> {
    let name = source.file_name().ok_or_else(|| ConvertError::InvalidSource {
        path: source.to_path_buf(),
    })?;
    Ok(output_dir(source, density).join(name))
}
