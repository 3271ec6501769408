//! # Density Fan-out
//!
//! Takes source images authored at one screen density and writes a rescaled copy for every
//! density in a catalog, into sibling `drawable-<name>` folders:
//!
//! ```text
//! res/icon.png            (mdpi, 48x48)
//! res/drawable-ldpi/icon.png    36x36
//! res/drawable-mdpi/icon.png    48x48, byte copy
//! res/drawable-hdpi/icon.png    72x72
//! ...
//! ```
//!
//! Files named `*.9.<ext>` are treated as 9-patch images: the one-pixel frame of stretch and
//! padding markers is validated and scaled separately from the content.
//!
//! ## Architecture
//!
//! - `density`: named scale factors and the ordered catalog
//! - `config`: batch configuration shared by the CLI and library callers
//! - `job`: per-file job record and its state machine
//! - `task`: runs one job (decode, rescale, encode) on a blocking thread
//! - `scheduler`: bounded worker pool over Tokio
//! - `codec`: image I/O and the two global locks
//! - `observer`: status fan-out to channels and logs
//!
//! Pixel work lives in the `densify_scale` crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use density_fanout::{convert_batch, ConverterConfig, LogObserver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConverterConfig::default();
//! let report = convert_batch(&config, ["res/icon.png", "res/button.9.png"], Arc::new(LogObserver)).await?;
//! println!("{} of {} finished", report.finished().count(), report.jobs.len());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

pub mod codec;
pub mod config;
pub mod density;
pub mod error;
pub mod job;
pub mod observer;
pub mod scheduler;
pub mod task;

pub use config::ConverterConfig;
pub use density::{Density, DensityCatalog};
pub use error::{ConvertError, ConvertResult, FailureKind, FailureReason};
pub use job::{ConversionJob, JobId, JobStatus, JobUpdate};
pub use observer::{LogObserver, ObserverMultiplexer, StatusObserver};
pub use scheduler::{BatchReport, FanoutScheduler};

/// Convert `sources` with `config` and wait for all of them.
pub async fn convert_batch<I, P>(
    config: &ConverterConfig,
    sources: I,
    observer: Arc<dyn StatusObserver>,
) -> ConvertResult<BatchReport>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut scheduler = FanoutScheduler::from_config(config, observer)?;
    let input = config.input_density()?;
    scheduler.submit_batch(sources, &input);
    Ok(scheduler.wait().await)
}
