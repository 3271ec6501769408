//! # Conversion Task
//!
//! Runs one [`ConversionJob`] to completion on the current thread:
//!
//! 1. decode the source once (under the codec lock) → `InProgress`;
//! 2. for every catalog density, in order:
//!    - identity density: byte copy of the source;
//!    - otherwise: rescale (or 9-patch rescale) outside any lock, then encode;
//! 3. `Finished`, or `Error` on the first failure.
//!
//! Outputs written before a failure stay on disk. Each scaled density first deletes whatever a
//! previous run left at its output path, so a density that fails has no file at all. A malformed
//! 9-patch is malformed at every ratio, so its stale scaled outputs for the remaining densities
//! are deleted too.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use densify_scale::{ninepatch, PixelBuffer, ScaleError};
use log::{debug, warn};

use crate::codec;
use crate::density::{Density, DensityCatalog};
use crate::error::{ConvertError, ConvertResult, FailureKind};
use crate::job::{ConversionJob, JobEvent};
use crate::observer::StatusObserver;

/// Whether `path` names a 9-patch image (`name.9.ext`).
pub fn is_nine_patch(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(ninepatch::is_nine_patch_name)
}

/// Compute the raster for one non-identity density.
pub fn render_density(source: &PixelBuffer, ratio: f32, nine_patch: bool) -> Result<PixelBuffer, ScaleError> {
    if nine_patch {
        ninepatch::scale_nine_patch(source, ratio)
    } else {
        let target = source.size().scaled(ratio);
        densify_scale::rescale(source, target.w, target.h)
    }
}

/// One job plus everything it needs to run.
pub struct ConversionTask {
    job: ConversionJob,
    catalog: Arc<DensityCatalog>,
    observer: Arc<dyn StatusObserver>,
}

impl ConversionTask {
    pub fn new(job: ConversionJob, catalog: Arc<DensityCatalog>, observer: Arc<dyn StatusObserver>) -> Self {
        Self { job, catalog, observer }
    }

    /// Run to a terminal state and hand the job back.
    pub fn run(mut self) -> ConversionJob {
        let event = match self.execute() {
            Ok(()) => JobEvent::Completed,
            Err(error) => {
                warn!("{} {}: {}", self.job.id, self.job.source.display(), error);
                JobEvent::Failed(error.failure_reason())
            }
        };
        if let Err(error) = self.transition(event) {
            warn!("{} {}: {}", self.job.id, self.job.source.display(), error);
        }
        self.job
    }

    fn execute(&mut self) -> ConvertResult<()> {
        let source_path = self.job.source.clone();

        let started = Instant::now();
        let source = codec::decode(&source_path)?;
        debug!("Opening {}: {:?}", source_path.display(), started.elapsed());
        self.transition(JobEvent::Decoded)?;

        let nine_patch = is_nine_patch(&source_path);
        let catalog = Arc::clone(&self.catalog);
        for (index, density) in catalog.iter().enumerate() {
            if let Err(error) = self.process_density(&source_path, &source, density, nine_patch) {
                if error.kind() == FailureKind::Wrong9Patch {
                    self.discard_stale_outputs(&source_path, catalog.iter().skip(index + 1));
                }
                return Err(error);
            }
        }
        Ok(())
    }

    fn discard_stale_outputs<'a>(&self, source_path: &Path, densities: impl Iterator<Item = &'a Density>) {
        let input = &self.job.input_density;
        for density in densities.filter(|d| !d.is_identity_for(input)) {
            let removed = codec::output_path(source_path, density).and_then(|path| codec::remove_output(&path));
            if let Err(error) = removed {
                warn!("{} {}: {}", self.job.id, source_path.display(), error);
            }
        }
    }

    fn process_density(
        &self,
        source_path: &Path,
        source: &PixelBuffer,
        density: &Density,
        nine_patch: bool,
    ) -> ConvertResult<()> {
        let input = &self.job.input_density;
        let output = codec::output_path(source_path, density)?;

        if density.is_identity_for(input) {
            codec::ensure_output_dir(source_path, density)?;
            return codec::copy_verbatim(source_path, &output);
        }

        codec::remove_output(&output)?;

        let started = Instant::now();
        let scaled = render_density(source, density.ratio_from(input), nine_patch)
            .map_err(|e| ConvertError::from_scale(source_path, &density.name, e))?;
        debug!(
            "Scaling {} {}: {:?} → {}",
            source_path.display(),
            density.name,
            started.elapsed(),
            scaled.size()
        );

        codec::ensure_output_dir(source_path, density)?;
        let started = Instant::now();
        codec::encode(&scaled, &output)?;
        debug!("Writing {}: {:?}", output.display(), started.elapsed());
        Ok(())
    }

    fn transition(&mut self, event: JobEvent) -> ConvertResult<()> {
        self.job.apply(event)?;
        self.observer.publish(self.job.snapshot());
        Ok(())
    }
}
