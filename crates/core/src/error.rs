//! Error types for the pagechunk workspace.
//!
//! One enum covers every failure the chunking engine can report: bad
//! configuration, out-of-range parameters, similarity computations that
//! cannot proceed, plus the I/O and serialization errors of config loading.

use thiserror::Error;

/// Unified error type for pagechunk.
///
/// All fallible functions return `Result<T, AppError>`.
/// Errors are logged where they are detected and then propagated unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown chunking method, missing page map, unreadable config
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parameters outside their valid range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fragment segmentation or similarity computation cannot proceed
    #[error("Segmentation error: {0}")]
    Segmentation(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
