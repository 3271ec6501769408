//! # Configuration Module
//!
//! This module provides the converter configuration and its validation.

pub mod config;

pub use config::ConverterConfig;
