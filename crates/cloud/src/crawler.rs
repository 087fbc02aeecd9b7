//! Archive crawler: builds the region catalog from EPT descriptors.
//!
//! One sequential GET per candidate region name. A failed entry is counted
//! and logged but never aborts the crawl; the resulting catalog is only
//! considered complete once every candidate has been attempted.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use eptfetch_core::{ArchiveBase, RegionRecord};

use crate::ept::EptResource;
use crate::error::{CloudError, Result};

// ---------------------------------------------------------------------------
// Name splitting
// ---------------------------------------------------------------------------

/// Year token: a 20xx group near the end of the folder name.
fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<region>.*?)(?P<year>20\d{2})\D*$").expect("valid regex"))
}

/// Split an archive folder name into `(display name, year)`.
///
/// `"CO_Denver_2017/"` → `("CO_Denver_", "2017")`. Names without a year
/// token keep the index's two-character entry suffix out of the display
/// name and get an empty year: `"WA_King_County/"` → `("WA_King_Coun", "")`.
pub fn split_region_year(raw: &str) -> (String, String) {
    let name = raw.trim_end_matches('/');

    if let Some(caps) = year_regex().captures(name) {
        return (caps["region"].to_string(), caps["year"].to_string());
    }

    let cut = name.len().saturating_sub(2);
    (name[..cut].to_string(), String::new())
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`CatalogBuilder`].
#[derive(Debug, Clone)]
pub struct CatalogBuilderOptions {
    /// Per-request timeout (default 30 s).
    pub request_timeout: Duration,
    /// Maximum retries per entry on transient failures (default 3).
    pub max_retries: u32,
}

impl Default for CatalogBuilderOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Crawl report
// ---------------------------------------------------------------------------

/// Outcome of a full crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// One record per successfully described region, in candidate order.
    pub records: Vec<RegionRecord>,
    /// Entries whose descriptor fetch failed.
    pub skipped: usize,
    /// Total candidates attempted.
    pub attempted: usize,
}

impl CrawlReport {
    /// Fold per-candidate results into a report. Failures become skips.
    pub fn collect<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<EptResource>)>,
    {
        let mut report = CrawlReport::default();
        for (name, result) in results {
            report.attempted += 1;
            match result {
                Ok(ept) => report.records.push(record_from_descriptor(&name, &ept)),
                Err(e) => {
                    warn!(name = %name, error = %e, "skipping region");
                    report.skipped += 1;
                }
            }
        }
        report
    }
}

/// Turn a descriptor into its catalog row.
pub fn record_from_descriptor(raw_name: &str, ept: &EptResource) -> RegionRecord {
    let (region, year) = split_region_year(raw_name);
    let bbox = ept.bbox();
    RegionRecord {
        filename: raw_name.to_string(),
        region,
        year,
        xmin: bbox.min_x,
        xmax: bbox.max_x,
        ymin: bbox.min_y,
        ymax: bbox.max_y,
        points: ept.points,
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Crawls the archive's per-region resource descriptors.
pub struct CatalogBuilder {
    archive: ArchiveBase,
    client: reqwest::Client,
    options: CatalogBuilderOptions,
}

impl CatalogBuilder {
    pub fn new(archive: ArchiveBase, options: CatalogBuilderOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| CloudError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            archive,
            client,
            options,
        })
    }

    pub fn archive(&self) -> &ArchiveBase {
        &self.archive
    }

    /// Crawl every candidate, one blocking call at a time.
    pub async fn crawl(&self, names: &[String]) -> CrawlReport {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let result = self.fetch_descriptor(name).await;
            if result.is_ok() {
                debug!(name = %name, "described region");
            }
            results.push((name.clone(), result));
        }
        CrawlReport::collect(results)
    }

    /// Fetch one region's `ept.json`, with bounded retries and exponential
    /// backoff on transient failures. Client errors (4xx) are not retried.
    pub async fn fetch_descriptor(&self, name: &str) -> Result<EptResource> {
        let url = self.archive.ept_url(name);
        let mut last_err = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s, 2s, ...
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.get(&url).send().await;

            match resp {
                Ok(r) if r.status().is_success() => {
                    let body = r.text().await.map_err(|e| {
                        CloudError::Network(format!("reading descriptor body: {e}"))
                    })?;
                    return serde_json::from_str(&body).map_err(|e| CloudError::Descriptor {
                        name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
                Ok(r) => {
                    let status = r.status();
                    last_err = Some(CloudError::Network(format!(
                        "descriptor fetch returned HTTP {status} for {url}"
                    )));
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_err = Some(CloudError::Network(format!(
                        "descriptor fetch failed for {url}: {e}"
                    )));
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| CloudError::Network(format!("descriptor fetch failed for {url}"))))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
