//! Error types for eptfetch

use thiserror::Error;

/// Main error type for eptfetch operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("region catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    #[error("region '{name}' is not present in the catalog")]
    RegionNotFound { name: String },

    #[error("no archive region fully covers bounds ({min_x}, {min_y}, {max_x}, {max_y})")]
    NoRegionCovers {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidGeometry`].
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Error::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::CatalogUnavailable`].
    pub fn catalog_unavailable(reason: impl Into<String>) -> Self {
        Error::CatalogUnavailable {
            reason: reason.into(),
        }
    }
}

/// Result type alias for eptfetch operations
pub type Result<T> = std::result::Result<T, Error>;
