//! # Screen Densities
//!
//! A [`Density`] is a named scale factor; a [`DensityCatalog`] is the ordered list of densities
//! every source image is fanned out to. The catalog order is the order in which a job writes its
//! outputs.
//!
//! The default catalog is the Android drawable set:
//!
//! | Name | Scale |
//! |------|-------|
//! | `ldpi` | 0.75 |
//! | `mdpi` | 1.0 |
//! | `hdpi` | 1.5 |
//! | `xhdpi` | 2.0 |
//! | `xxhdpi` | 3.0 |
//! | `xxxhdpi` | 4.0 |
//!
//! Custom catalogs are plain JSON arrays:
//!
//! ```json
//! [{ "name": "ldpi", "scale": 0.75 }, { "name": "mdpi", "scale": 1.0 }]
//! ```

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

/// Prefix of every per-density output folder.
pub const FOLDER_PREFIX: &str = "drawable-";

/// A named screen density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub name: String,
    #[serde(rename = "scale")]
    pub scale_factor: f32,
}

impl Density {
    pub fn new(name: impl Into<String>, scale_factor: f32) -> Self {
        Self {
            name: name.into(),
            scale_factor,
        }
    }

    /// Name of the sibling folder holding this density's outputs, e.g. `drawable-hdpi`.
    pub fn folder_name(&self) -> String {
        format!("{FOLDER_PREFIX}{}", self.name)
    }

    /// Whether an image authored at `input` needs no scaling to reach this density.
    pub fn is_identity_for(&self, input: &Density) -> bool {
        self.scale_factor == input.scale_factor
    }

    /// Factor to apply to an image authored at `input`.
    pub fn ratio_from(&self, input: &Density) -> f32 {
        densify_scale::presets::density_ratio(self.scale_factor, input.scale_factor)
    }
}

impl std::fmt::Display for Density {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x)", self.name, self.scale_factor)
    }
}

/// Ordered, read-only table of output densities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityCatalog {
    densities: Vec<Density>,
}

impl Default for DensityCatalog {
    fn default() -> Self {
        Self::new(vec![
            Density::new("ldpi", 0.75),
            Density::new("mdpi", 1.0),
            Density::new("hdpi", 1.5),
            Density::new("xhdpi", 2.0),
            Density::new("xxhdpi", 3.0),
            Density::new("xxxhdpi", 4.0),
        ])
    }
}

impl DensityCatalog {
    pub fn new(densities: Vec<Density>) -> Self {
        Self { densities }
    }

    /// Parse a JSON catalog and validate it.
    pub fn from_json_str(json: &str) -> ConvertResult<Self> {
        let catalog: DensityCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a JSON catalog from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ConvertError::io("read catalog", path, e))?;
        Self::from_json_str(&json)
    }

    /// Look a density up by name.
    pub fn get(&self, name: &str) -> ConvertResult<&Density> {
        self.densities
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ConvertError::UnknownDensity(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Density> {
        self.densities.iter()
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    /// Reject empty catalogs, blank or duplicate names, and unusable scale factors.
    pub fn validate(&self) -> ConvertResult<()> {
        if self.densities.is_empty() {
            return Err(ConvertError::config("catalog", "[]", "must contain at least one density"));
        }
        let mut seen = HashSet::new();
        for density in &self.densities {
            if density.name.trim().is_empty() {
                return Err(ConvertError::config("catalog.name", "", "density names must not be empty"));
            }
            if !seen.insert(density.name.as_str()) {
                return Err(ConvertError::config("catalog.name", &density.name, "duplicate density name"));
            }
            if !density.scale_factor.is_finite() || density.scale_factor <= 0.0 {
                return Err(ConvertError::config(
                    "catalog.scale",
                    density.scale_factor.to_string(),
                    format!("scale of '{}' must be a positive number", density.name),
                ));
            }
        }
        Ok(())
    }
}
