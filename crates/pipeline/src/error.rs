//! Error types for pipeline construction and execution.

use thiserror::Error;

/// Errors produced while building or running a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required parameter slot is missing or a stage chain is malformed.
    /// This is a programming/configuration error and is fatal.
    #[error("pipeline template error: {reason}")]
    Template { reason: String },

    /// The external executor failed; carries the underlying cause.
    #[error("pipeline execution failed: {reason}")]
    Execution { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pipeline serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("point file error: {0}")]
    Las(#[from] las::Error),

    #[error("core error: {0}")]
    Core(#[from] eptfetch_core::Error),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::Template`].
    pub fn template(reason: impl Into<String>) -> Self {
        PipelineError::Template {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PipelineError::Execution`].
    pub fn execution(reason: impl Into<String>) -> Self {
        PipelineError::Execution {
            reason: reason.into(),
        }
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
