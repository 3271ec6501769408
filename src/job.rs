//! # Conversion Jobs
//!
//! A [`ConversionJob`] is plain data: which file, at which density, and where it stands. Its
//! lifecycle is a small state machine driven by [`JobStatus::advance`]:
//!
//! ```text
//! Pending ──Decoded──▶ InProgress ──Completed──▶ Finished
//!    │                     │
//!    └──────Failed─────────┴──────────────────▶ Error(reason)
//! ```
//!
//! `Finished` and `Error` are terminal. There are no retries; a failed job stays failed.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::density::Density;
use crate::error::{ConvertError, ConvertResult, FailureReason};

/// Identifier assigned by the scheduler at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a job stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Enqueued, source not read yet
    Pending,
    /// Source decoded, outputs being produced
    InProgress,
    /// Every density written
    Finished,
    /// Stopped on the first failure
    Error(FailureReason),
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Decoded,
    Completed,
    Failed(FailureReason),
}

impl JobEvent {
    fn name(&self) -> &'static str {
        match self {
            JobEvent::Decoded => "decoded",
            JobEvent::Completed => "completed",
            JobEvent::Failed(_) => "failed",
        }
    }
}

impl JobStatus {
    /// Pure transition function.
    pub fn advance(self, event: JobEvent) -> ConvertResult<JobStatus> {
        match (self, event) {
            (JobStatus::Pending, JobEvent::Decoded) => Ok(JobStatus::InProgress),
            (JobStatus::InProgress, JobEvent::Completed) => Ok(JobStatus::Finished),
            (JobStatus::Pending | JobStatus::InProgress, JobEvent::Failed(reason)) => {
                Ok(JobStatus::Error(reason))
            }
            (from, event) => Err(ConvertError::InvalidTransition {
                from: from.name(),
                event: event.name(),
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Error(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in progress",
            JobStatus::Finished => "finished",
            JobStatus::Error(_) => "error",
        }
    }

    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            JobStatus::Error(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Error(reason) => write!(f, "error ({reason})"),
            other => f.write_str(other.name()),
        }
    }
}

/// One source file being fanned out.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub id: JobId,
    pub source: PathBuf,
    pub input_density: Density,
    status: JobStatus,
}

impl ConversionJob {
    pub fn new(id: JobId, source: impl Into<PathBuf>, input_density: Density) -> Self {
        Self {
            id,
            source: source.into(),
            input_density,
            status: JobStatus::Pending,
        }
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Feed one event through the state machine. On error the status is left untouched.
    pub fn apply(&mut self, event: JobEvent) -> ConvertResult<&JobStatus> {
        self.status = self.status.clone().advance(event)?;
        Ok(&self.status)
    }

    /// Status snapshot for observers.
    pub fn snapshot(&self) -> JobUpdate {
        JobUpdate {
            id: self.id,
            source: self.source.clone(),
            status: self.status.clone(),
        }
    }
}

/// What observers receive after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    pub id: JobId,
    pub source: PathBuf,
    pub status: JobStatus,
}

impl JobUpdate {
    pub fn source(&self) -> &Path {
        &self.source
    }
}
