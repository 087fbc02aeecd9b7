//! Error types for the archive crawler.

use thiserror::Error;

/// Errors produced while crawling the archive.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("bad resource descriptor for '{name}': {reason}")]
    Descriptor { name: String, reason: String },

    #[error("core error: {0}")]
    Core(#[from] eptfetch_core::Error),
}

/// Result alias for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;
