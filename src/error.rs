//! # Error Handling
//!
//! Two layers of errors live here:
//!
//! - [`ConvertError`]: everything that can go wrong while configuring the converter or running a
//!   job, with the offending path or density attached.
//! - [`FailureReason`]: the compact, cloneable summary that ends up in a job's terminal
//!   [`crate::job::JobStatus::Error`] state and travels through the status channel.
//!
//! Job-level failures fall into exactly three [`FailureKind`]s: the source could not be decoded,
//! the 9-patch frame is malformed, or an output could not be produced or written. They are local
//! to the job that hit them; the scheduler keeps running other jobs.
//!
//! ## Usage
//!
//! ```rust
//! use density_fanout::error::{ConvertError, FailureKind};
//!
//! let error = ConvertError::config("workers", "0", "must be greater than 0");
//! assert_eq!(error.category(), "config");
//! assert_eq!(error.failure_reason().kind, FailureKind::EncodeFailure);
//! ```

use std::{fmt, io, path::PathBuf};

use densify_scale::{ScaleError, ninepatch::BorderError};

/// The three ways a conversion job can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Source unreadable or not a valid raster
    DecodeFailure,
    /// Border validation failed on a `.9` image
    Wrong9Patch,
    /// An output could not be computed, copied or written
    EncodeFailure,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::DecodeFailure => "decode failure",
            FailureKind::Wrong9Patch => "malformed 9-patch",
            FailureKind::EncodeFailure => "encode/write failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind plus human-readable detail, carried by a terminal error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Base error type for the converter
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The source file could not be opened or decoded
    #[error("failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The source path has no file name to reuse for the outputs
    #[error("'{}' does not name a file", path.display())]
    InvalidSource { path: PathBuf },

    /// A `.9` image has a malformed frame
    #[error("malformed 9-patch '{}' at {density}: {source}", path.display())]
    NinePatch {
        path: PathBuf,
        density: String,
        #[source]
        source: BorderError,
    },

    /// The rescaler failed for reasons other than the 9-patch frame
    #[error("scaling '{}' to {density} failed: {source}", path.display())]
    Scale {
        path: PathBuf,
        density: String,
        #[source]
        source: ScaleError,
    },

    /// The codec refused to write an output
    #[error("failed to encode '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem failure while creating a folder or copying a file
    #[error("I/O error during {operation} on '{}': {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration validation errors
    #[error("configuration error in '{field}': {reason} (value: {value})")]
    Config {
        field: String,
        value: String,
        reason: String,
    },

    /// The density catalog could not be parsed
    #[error("invalid density catalog: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    /// A density name that is not in the catalog
    #[error("unknown density '{0}'")]
    UnknownDensity(String),

    /// A job was asked to make a transition its state machine does not allow
    #[error("invalid transition from '{from}' on '{event}'")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    /// No Tokio runtime was available to host the worker pool
    #[error("the scheduler must be created inside a Tokio runtime")]
    NoRuntime,
}

impl ConvertError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Attach path and density to a rescaler error, splitting out malformed frames.
    pub fn from_scale(path: impl Into<PathBuf>, density: impl Into<String>, error: ScaleError) -> Self {
        let (path, density) = (path.into(), density.into());
        match error {
            ScaleError::NinePatch(source) => Self::NinePatch {
                path,
                density,
                source,
            },
            source => Self::Scale {
                path,
                density,
                source,
            },
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Decode { .. } | Self::InvalidSource { .. } => "decode",
            Self::NinePatch { .. } => "nine_patch",
            Self::Scale { .. } => "scale",
            Self::Encode { .. } => "encode",
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
            Self::CatalogFormat(_) | Self::UnknownDensity(_) => "catalog",
            Self::InvalidTransition { .. } => "state",
            Self::NoRuntime => "runtime",
        }
    }

    /// Job-level classification used for the terminal status.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Decode { .. } | Self::InvalidSource { .. } => FailureKind::DecodeFailure,
            Self::NinePatch { .. } => FailureKind::Wrong9Patch,
            _ => FailureKind::EncodeFailure,
        }
    }

    pub fn failure_reason(&self) -> FailureReason {
        FailureReason::new(self.kind(), self.to_string())
    }
}

/// Result type alias using our custom error type
pub type ConvertResult<T> = Result<T, ConvertError>;
