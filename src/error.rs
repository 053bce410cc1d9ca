//! Error types for gtftools

use thiserror::Error;

/// Result type alias for gtftools operations
pub type Result<T> = std::result::Result<T, GtfToolsError>;

/// Main error type for gtftools
#[derive(Error, Debug)]
pub enum GtfToolsError {
    /// IO errors while reading records
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The GTF file could not be opened for reading
    #[error("cannot open GTF file {path}: {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GtfToolsError {
    fn from(err: serde_json::Error) -> Self {
        GtfToolsError::Serialization(err.to_string())
    }
}
