//! Blocking (synchronous) API for the crawler.
//!
//! Wraps the async [`CatalogBuilder`] with a Tokio runtime so callers don't
//! need to manage their own async runtime.

use eptfetch_core::ArchiveBase;

use crate::crawler::{CatalogBuilder, CatalogBuilderOptions, CrawlReport};
use crate::ept::EptResource;
use crate::error::{CloudError, Result};

/// Blocking wrapper around [`CatalogBuilder`].
///
/// Uses an internal single-threaded Tokio runtime.
pub struct CatalogBuilderBlocking {
    rt: tokio::runtime::Runtime,
    inner: CatalogBuilder,
}

impl CatalogBuilderBlocking {
    /// Create a new blocking catalog builder.
    pub fn new(archive: ArchiveBase, options: CatalogBuilderOptions) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CloudError::Network(e.to_string()))?;

        let inner = CatalogBuilder::new(archive, options)?;
        Ok(Self { rt, inner })
    }

    /// Crawl every candidate (blocking).
    pub fn crawl(&self, names: &[String]) -> CrawlReport {
        self.rt.block_on(self.inner.crawl(names))
    }

    /// Fetch one region's descriptor (blocking).
    pub fn fetch_descriptor(&self, name: &str) -> Result<EptResource> {
        self.rt.block_on(self.inner.fetch_descriptor(name))
    }
}

/// One-shot convenience: crawl a name list against an archive.
pub fn crawl_archive(
    archive: ArchiveBase,
    names: &[String],
    options: CatalogBuilderOptions,
) -> Result<CrawlReport> {
    let builder = CatalogBuilderBlocking::new(archive, options)?;
    Ok(builder.crawl(names))
}
