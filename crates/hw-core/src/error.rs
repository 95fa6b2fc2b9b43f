//! Error types for hw-helper

use thiserror::Error;

/// Main error type for hw-helper
#[derive(Debug, Error)]
pub enum HwError {
    /// No session matched the requested ids
    #[error("Session not found: {0}")]
    NotFound(String),

    /// A single-session format was requested for several sessions
    #[error("Format '{format}' exports exactly one session, but {count} were requested")]
    UnsupportedBatch { format: String, count: usize },

    /// The session store could not be read
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Renderer failed to assemble an artifact
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for HwError {
    fn from(err: zip::result::ZipError) -> Self {
        HwError::Render(format!("failed to assemble document package: {}", err))
    }
}

/// Result type alias for hw-helper
pub type Result<T> = std::result::Result<T, HwError>;
