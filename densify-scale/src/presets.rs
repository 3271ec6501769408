// SPDX-License-Identifier: MIT
//! # Scale Plans
//!
//! A [`ScalePlan`] describes every buffer a rescale will produce before any pixel is touched:
//! the clamped output size and the chain of intermediate halvings that precede the final
//! bilinear pass.
//!
//! ## Staged Downscaling
//!
//! A single bilinear pass samples at most a 2×2 neighbourhood per output pixel, so shrinking by
//! more than half skips source pixels entirely and aliases. The plan therefore halves the working
//! size while `target_w * 2 < current_w - 1` and only then resamples to the exact target.
//!
//! Only the width is inspected; height is halved in lockstep. Very tall, narrow sources are
//! therefore resampled in one step vertically even when the height ratio is small.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Replace zero dimensions with 1; a raster never has zero area.
    pub fn at_least_one(self) -> Self {
        Self { w: self.w.max(1), h: self.h.max(1) }
    }

    /// Scale both sides by `ratio`, truncating toward zero.
    ///
    /// A 15px mdpi asset becomes 11px at ldpi (`15 * 0.75 = 11.25`).
    pub fn scaled(self, ratio: f32) -> Self {
        Self {
            w: (ratio * self.w as f32) as u32,
            h: (ratio * self.h as f32) as u32,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Everything needed to execute one rescale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalePlan {
    /// Source dimensions
    pub input: Size,
    /// Final output dimensions, never zero
    pub out: Size,
    /// Intermediate sizes produced by successive halvings, in execution order
    pub halvings: Vec<Size>,
}

impl ScalePlan {
    /// True when the output is the input, untouched.
    pub fn is_identity(&self) -> bool {
        self.halvings.is_empty() && self.input == self.out
    }
}

/// Compute the plan for resizing `input` to `target`.
pub fn build_plan(input: Size, target: Size) -> ScalePlan {
    let out = target.at_least_one();
    ScalePlan {
        input,
        out,
        halvings: halving_steps(input, out.w),
    }
}

/// The chain of halvings the downscale guard demands before the final bilinear pass.
pub fn halving_steps(input: Size, target_w: u32) -> Vec<Size> {
    let target_w = u64::from(target_w.max(1));
    let mut steps = Vec::new();
    let mut current = input;
    while target_w * 2 < u64::from(current.w).saturating_sub(1) {
        current = Size { w: current.w / 2, h: current.h / 2 }.at_least_one();
        steps.push(current);
    }
    steps
}

/// Ratio between two density scale factors, e.g. `1.5 / 1.0` for mdpi → hdpi.
pub fn density_ratio(target_scale: f32, input_scale: f32) -> f32 {
    target_scale / input_scale
}
