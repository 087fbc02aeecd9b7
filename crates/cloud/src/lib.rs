//! # eptfetch Cloud
//!
//! Archive crawler for the eptfetch region catalog.
//!
//! Each archive region serves an `ept.json` resource descriptor; the
//! crawler fetches one per candidate name (sequentially, with bounded
//! retries and exponential backoff), extracts the display name, year,
//! extent and point count, and hands back the rows of the persisted
//! catalog. Failed entries are skipped and counted, never fatal.

pub mod crawler;
pub mod ept;
pub mod error;
pub mod sync_api;

pub use crawler::{
    record_from_descriptor, split_region_year, CatalogBuilder, CatalogBuilderOptions, CrawlReport,
};
pub use ept::{EptResource, EptSrs};
pub use error::{CloudError, Result};

/// Blocking API re-exported as `blocking` module.
pub mod blocking {
    pub use crate::sync_api::*;
}
