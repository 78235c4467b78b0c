//! Error types and error handling for the Ferret indexing engine.
//!
//! This module defines the error types used throughout the
//! application. Per-document problems (unreadable file, bad
//! encoding) are recoverable and never surface here; these variants
//! cover the failures that abort or degrade an indexing pass.

use thiserror::Error;

/// Result type alias for Ferret operations
pub type Result<T> = std::result::Result<T, FerretError>;

/// Main error type for the Ferret engine
#[derive(Error, Debug)]
pub enum FerretError {
    /// The status updater asked us to stop, or an external stop
    /// signal was raised. The pass is abandoned, the store closed.
    #[error("Indexing cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl FerretError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check whether this error is an operator-requested cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FerretError::Cancelled(_))
    }

    /// Fatal errors abort the whole pass (session open/close, bad
    /// configuration); everything else degrades or is skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FerretError::StorageError(_) | FerretError::ConfigError(_) | FerretError::Cancelled(_)
        )
    }
}
