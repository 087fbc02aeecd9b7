//! # eptfetch Core
//!
//! Core types for the eptfetch LIDAR acquisition tool.
//!
//! This crate provides:
//! - `Crs`: EPSG-centric coordinate reference system handling
//! - `Polygon` / `BBox`: area-of-interest geometry
//! - Pure-Rust reprojection between the supported frames
//! - `RegionCatalog`: the persisted per-region metadata table
//! - `RegionResolver`: explicit-name and bounds-search region selection
//! - `ArchiveBase`: locator conventions for the point-cloud archive

pub mod archive;
pub mod catalog;
pub mod crs;
pub mod error;
pub mod geometry;
pub mod resolver;

pub use archive::{ArchiveBase, DEFAULT_ARCHIVE_BASE};
pub use catalog::{RegionCatalog, RegionRecord};
pub use crs::{Crs, ARCHIVE_EPSG};
pub use error::{Error, Result};
pub use geometry::{BBox, Polygon};
pub use resolver::{RegionQuery, RegionResolver, Resolution};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::archive::ArchiveBase;
    pub use crate::catalog::{RegionCatalog, RegionRecord};
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::projection::{project_bounds, project_polygon};
    pub use crate::geometry::{BBox, Polygon};
    pub use crate::resolver::{RegionQuery, RegionResolver, Resolution};
}
