//! # Fan-out Scheduler
//!
//! Accepts source files and runs each one as a [`ConversionTask`] on a bounded pool of blocking
//! workers. At most `workers` jobs execute at once; the rest wait for a permit in submission
//! order. Nothing is ordered across jobs beyond that.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use density_fanout::density::{Density, DensityCatalog};
//! use density_fanout::observer::LogObserver;
//! use density_fanout::scheduler::FanoutScheduler;
//!
//! # async fn example() -> density_fanout::ConvertResult<()> {
//! let mut scheduler = FanoutScheduler::new(DensityCatalog::default(), 4, Arc::new(LogObserver))?;
//! scheduler.submit("res/icon.png", Density::new("mdpi", 1.0));
//! let report = scheduler.wait().await;
//! assert_eq!(report.jobs.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::ConverterConfig;
use crate::density::{Density, DensityCatalog};
use crate::error::{ConvertError, ConvertResult, FailureKind, FailureReason};
use crate::job::{ConversionJob, JobEvent, JobId, JobStatus};
use crate::observer::StatusObserver;
use crate::task::ConversionTask;

/// Bounded worker pool for conversion jobs.
pub struct FanoutScheduler {
    catalog: Arc<DensityCatalog>,
    observer: Arc<dyn StatusObserver>,
    permits: Arc<Semaphore>,
    tasks: JoinSet<ConversionJob>,
    handle: Handle,
    workers: usize,
    next_id: u64,
}

impl FanoutScheduler {
    /// Create a scheduler on the current Tokio runtime. A worker count of 0 is treated as 1.
    pub fn new(
        catalog: DensityCatalog,
        workers: usize,
        observer: Arc<dyn StatusObserver>,
    ) -> ConvertResult<Self> {
        let handle = Handle::try_current().map_err(|_| ConvertError::NoRuntime)?;
        let workers = workers.max(1);
        Ok(Self {
            catalog: Arc::new(catalog),
            observer,
            permits: Arc::new(Semaphore::new(workers)),
            tasks: JoinSet::new(),
            handle,
            workers,
            next_id: 0,
        })
    }

    /// Validate `config` and build a scheduler from it.
    pub fn from_config(config: &ConverterConfig, observer: Arc<dyn StatusObserver>) -> ConvertResult<Self> {
        config
            .validate()
            .map_err(|reason| ConvertError::config("config", &config.input_density, reason))?;
        Self::new(config.catalog.clone(), config.workers, observer)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Jobs submitted and not yet collected by [`wait`](Self::wait).
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Enqueue one source. `Pending` is published before this returns.
    pub fn submit(&mut self, source: impl Into<PathBuf>, input_density: Density) -> JobId {
        self.next_id += 1;
        let id = JobId(self.next_id);
        let job = ConversionJob::new(id, source, input_density);
        self.observer.publish(job.snapshot());
        debug!("{} queued: {}", id, job.source.display());

        let permits = Arc::clone(&self.permits);
        let observer = Arc::clone(&self.observer);
        let task = ConversionTask::new(job.clone(), Arc::clone(&self.catalog), Arc::clone(&observer));

        self.tasks.spawn_on(
            async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await;
                match tokio::task::spawn_blocking(move || task.run()).await {
                    Ok(finished) => finished,
                    Err(join_error) => {
                        error!("{} worker died: {}", job.id, join_error);
                        fail_panicked(job, observer.as_ref())
                    }
                }
            },
            &self.handle,
        );
        id
    }

    /// Enqueue several sources at the same input density.
    pub fn submit_batch<I, P>(&mut self, sources: I, input_density: &Density) -> Vec<JobId>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        sources
            .into_iter()
            .map(|source| self.submit(source, input_density.clone()))
            .collect()
    }

    /// Wait for every submitted job and collect the results, ordered by job id.
    pub async fn wait(mut self) -> BatchReport {
        let mut jobs = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(job) => jobs.push(job),
                Err(join_error) => error!("Conversion task lost: {}", join_error),
            }
        }
        jobs.sort_by_key(|job| job.id);
        BatchReport { jobs }
    }
}

fn fail_panicked(mut job: ConversionJob, observer: &dyn StatusObserver) -> ConversionJob {
    let reason = FailureReason::new(FailureKind::EncodeFailure, "conversion worker panicked");
    if job.apply(JobEvent::Failed(reason)).is_ok() {
        observer.publish(job.snapshot());
    }
    job
}

/// Outcome of a batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub jobs: Vec<ConversionJob>,
}

impl BatchReport {
    pub fn finished(&self) -> impl Iterator<Item = &ConversionJob> {
        self.jobs
            .iter()
            .filter(|job| *job.status() == JobStatus::Finished)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ConversionJob> {
        self.jobs
            .iter()
            .filter(|job| matches!(job.status(), JobStatus::Error(_)))
    }

    /// True when every job finished.
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none() && self.finished().count() == self.jobs.len()
    }
}
