//! Pipeline error types
//!
//! Errors here surface only from session construction. Once a session is
//! running, failures stay contained inside the affected sink and are never
//! propagated back to the producing workload.

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid session configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem setup failed (log directory creation)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
