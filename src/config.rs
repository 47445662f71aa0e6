//! Simulation configuration files
//!
//! A `SimulationConfig` describes one system: fluid tunables, kernel choice,
//! domain, boundary shapes and neighbour search. Files are TOML or JSON,
//! chosen by extension. Every field has a default, so an empty file is a
//! valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryDescriptor;
use crate::error::{SphError, SphResult};
use crate::fluid::FluidParams;
use crate::kernel::KernelConfig;
use crate::spatial::NeighbourStrategy;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(ConfigFormat::Toml),
            Some("json") => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Domain size and gravity. Missing values fall back to the per-dimension
/// defaults of the system being built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub extents: Option<Vec<f32>>,
    pub gravity: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fluid: FluidParams,
    pub kernels: KernelConfig,
    pub domain: DomainConfig,
    pub boundaries: Vec<BoundaryDescriptor>,
    pub neighbour_strategy: NeighbourStrategy,
}

impl SimulationConfig {
    /// Load from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> SphResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| SphError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let raw = std::fs::read_to_string(path).map_err(|source| SphError::Io {
            path: PathBuf::from(path),
            source,
        })?;

        let config = match format {
            ConfigFormat::Toml => Self::from_toml_str(&raw)?,
            ConfigFormat::Json => Self::from_json_str(&raw)?,
        };
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> SphResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> SphResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
