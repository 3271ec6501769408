//! # Converter Configuration
//!
//! This module provides the configuration consumed by the scheduler. It is the common interface
//! between the `densify` CLI and library callers.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `input_density` | `String` | `mdpi` | Density the sources were authored at; must be in the catalog |
//! | `catalog` | `DensityCatalog` | Android set | Ordered output densities |
//! | `workers` | `usize` | host parallelism | Size of the worker pool, at least 1 |
//!
//! The input density is always taken from configuration, never inferred from the image.
//!
//! ## Examples
//!
//! ```rust
//! use density_fanout::config::ConverterConfig;
//! use density_fanout::density::DensityCatalog;
//!
//! // Use defaults
//! let config = ConverterConfig::default();
//! assert!(config.validate().is_ok());
//!
//! // Sources drawn at xhdpi, two workers
//! let config = ConverterConfig::new("xhdpi", DensityCatalog::default(), 2);
//! assert_eq!(config.input_density().unwrap().scale_factor, 2.0);
//! ```

use std::thread;

use crate::density::{Density, DensityCatalog};
use crate::error::ConvertResult;

/// Configuration structure for a conversion batch.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Name of the density every submitted source was authored at.
    pub input_density: String,

    /// Ordered output densities. Outputs are written in this order within a job.
    pub catalog: DensityCatalog,

    /// Number of jobs allowed to run at the same time.
    pub workers: usize,
}

impl Default for ConverterConfig {
    /// Sources at `mdpi`, the Android catalog, one worker per available CPU.
    fn default() -> Self {
        Self {
            input_density: "mdpi".to_string(),
            catalog: DensityCatalog::default(),
            workers: default_workers(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new configuration with the specified parameters.
    pub fn new(input_density: impl Into<String>, catalog: DensityCatalog, workers: usize) -> Self {
        Self {
            input_density: input_density.into(),
            catalog,
            workers,
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Worker count must be greater than 0".to_string());
        }
        self.catalog.validate().map_err(|e| e.to_string())?;
        if self.catalog.get(&self.input_density).is_err() {
            return Err(format!(
                "Input density '{}' is not in the catalog",
                self.input_density
            ));
        }
        Ok(())
    }

    /// Resolve the input density against the catalog.
    pub fn input_density(&self) -> ConvertResult<Density> {
        self.catalog.get(&self.input_density).cloned()
    }
}

/// Host parallelism, falling back to a single worker when it cannot be queried.
pub fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::Density;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.input_density, "mdpi");
        assert_eq!(config.catalog.len(), 6);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConverterConfig::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid worker count
        config.workers = 0;
        assert!(config.validate().is_err());
        config.workers = 4; // Reset

        // Unknown input density
        config.input_density = "tvdpi".to_string();
        assert!(config.validate().is_err());
        assert!(config.input_density().is_err());
        config.input_density = "hdpi".to_string(); // Reset

        // Broken catalog
        config.catalog = DensityCatalog::new(vec![Density::new("hdpi", -1.0)]);
        assert!(config.validate().is_err());

        config.catalog = DensityCatalog::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input_density().unwrap(), Density::new("hdpi", 1.5));
    }
}
