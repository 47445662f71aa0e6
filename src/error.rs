//! Error types for the fallible surface of the engine.
//!
//! The simulation step itself never fails: numerical trouble is reported as
//! `StabilityDiagnostic`s (see `fluid::diagnostics`). Only configuration
//! loading and descriptor conversion return `SphError`.

use std::path::PathBuf;

/// Result alias used across the crate
pub type SphResult<T> = Result<T, SphError>;

#[derive(Debug, thiserror::Error)]
pub enum SphError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("{what} has {found} components, expected {expected}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Create a dimension mismatch error
pub fn dimension_mismatch(what: impl Into<String>, expected: usize, found: usize) -> SphError {
    SphError::DimensionMismatch {
        what: what.into(),
        expected,
        found,
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(name: impl Into<String>, reason: impl std::fmt::Display) -> SphError {
    SphError::InvalidParameter {
        name: name.into(),
        reason: reason.to_string(),
    }
}
