//! Shared fixtures for the fan-out integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use density_fanout::codec;
use density_fanout::density::{Density, DensityCatalog};
use density_fanout::job::{JobId, JobStatus, JobUpdate};
use densify_scale::PixelBuffer;
use tokio::sync::mpsc::UnboundedReceiver;

pub const MARKER: u32 = 0xFF00_0000;
pub const CONTENT: u32 = 0xFF21_96F3;

/// ldpi, mdpi, hdpi in that order.
pub fn small_catalog() -> DensityCatalog {
    DensityCatalog::new(vec![
        Density::new("ldpi", 0.75),
        Density::new("mdpi", 1.0),
        Density::new("hdpi", 1.5),
    ])
}

pub fn mdpi() -> Density {
    Density::new("mdpi", 1.0)
}

/// Opaque diagonal gradient; `seed` shifts the colours so different icons differ.
pub fn gradient_icon(w: u32, h: u32, seed: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let r = (x * 255 / w.max(1) + seed * 17) & 0xFF;
            let g = (y * 255 / h.max(1) + seed * 5) & 0xFF;
            let b = ((x + y) * 4 + seed) & 0xFF;
            buffer.set(x, y, 0xFF00_0000 | (r << 16) | (g << 8) | b);
        }
    }
    buffer
}

/// `w × h` 9-patch: solid content, transparent frame, one stretch run on top and left and one
/// padding run on right and bottom.
pub fn nine_patch(w: u32, h: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(w, h);
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            buffer.set(x, y, CONTENT);
        }
    }
    for x in w / 3..2 * w / 3 {
        buffer.set(x, 0, MARKER);
        buffer.set(x, h - 1, MARKER);
    }
    for y in h / 3..2 * h / 3 {
        buffer.set(0, y, MARKER);
        buffer.set(w - 1, y, MARKER);
    }
    buffer
}

pub fn write_png(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    codec::encode(buffer, &path).expect("fixture should encode");
    path
}

pub fn read_png(path: &Path) -> PixelBuffer {
    codec::decode(path).expect("output should decode")
}

pub fn output(dir: &Path, density: &str, name: &str) -> PathBuf {
    dir.join(format!("drawable-{density}")).join(name)
}

/// Drain everything published so far.
pub fn drain(rx: &mut UnboundedReceiver<JobUpdate>) -> Vec<JobUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

/// Status names seen for one job, in publication order.
pub fn history(updates: &[JobUpdate], id: JobId) -> Vec<&'static str> {
    updates
        .iter()
        .filter(|update| update.id == id)
        .map(|update| update.status.name())
        .collect()
}

/// Frame pixels must be transparent or opaque black.
pub fn assert_clean_frame(buffer: &PixelBuffer) {
    let (w, h) = (buffer.width(), buffer.height());
    for x in 0..w {
        for y in [0, h - 1] {
            let p = buffer.get(x, y);
            assert!(p == 0 || p == MARKER, "frame pixel ({x},{y}) = {p:#010x}");
        }
    }
    for y in 0..h {
        for x in [0, w - 1] {
            let p = buffer.get(x, y);
            assert!(p == 0 || p == MARKER, "frame pixel ({x},{y}) = {p:#010x}");
        }
    }
}

pub fn is_error(status: &JobStatus) -> bool {
    matches!(status, JobStatus::Error(_))
}
