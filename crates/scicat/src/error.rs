//! Error types for the scicat library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scicat operations.
#[derive(Debug, Error)]
pub enum ScicatError {
    /// The hierarchical source file could not be opened or parsed.
    #[error("Cannot open source '{path}': {message}")]
    SourceUnavailable { path: PathBuf, message: String },

    /// A single value or attribute inside the source could not be read.
    #[error("Cannot read '{path}': {message}")]
    LeafUnreadable { path: String, message: String },

    /// Error reported by the HDF5 library.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The SciCat backend answered with a non-success status.
    #[error("SciCat error ({status}): {message}")]
    Comm { status: u16, message: String },

    /// Login against the SciCat backend failed.
    #[error("SciCat login failed: {0}")]
    Login(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File format not supported by this build.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for scicat operations.
pub type Result<T> = std::result::Result<T, ScicatError>;
