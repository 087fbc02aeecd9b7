//! Region resolution for a fetch request.
//!
//! Two modes, chosen once per request: an explicit region name is checked
//! for catalog membership and nothing else (no fallback search); a bounds
//! query selects every catalog region that fully contains the request bbox
//! and picks one deterministically.

use tracing::debug;

use crate::archive::ArchiveBase;
use crate::catalog::{RegionCatalog, RegionRecord};
use crate::error::{Error, Result};
use crate::geometry::BBox;

/// How the region for a request is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionQuery {
    /// Caller named the region; membership check only.
    Explicit(String),
    /// Search the catalog for regions covering these bounds
    /// (archive frame).
    Bounds(BBox),
}

/// A resolved region plus the alternatives that also qualified.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Chosen region name.
    pub region: String,
    /// Locator of the region's EPT descriptor.
    pub locator: String,
    /// Every covering record, selection order first. Explicit-mode
    /// resolutions carry the named record alone.
    pub candidates: Vec<RegionRecord>,
}

/// Resolves which archive region serves a request.
pub struct RegionResolver<'a> {
    catalog: &'a RegionCatalog,
    archive: &'a ArchiveBase,
}

impl<'a> RegionResolver<'a> {
    pub fn new(catalog: &'a RegionCatalog, archive: &'a ArchiveBase) -> Self {
        Self { catalog, archive }
    }

    pub fn resolve(&self, query: &RegionQuery) -> Result<Resolution> {
        match query {
            RegionQuery::Explicit(name) => self.resolve_explicit(name),
            RegionQuery::Bounds(bounds) => self.resolve_bounds(bounds),
        }
    }

    /// Explicit-region mode: the name must exist in the catalog, otherwise
    /// [`Error::RegionNotFound`]. No bounds search is attempted.
    pub fn resolve_explicit(&self, name: &str) -> Result<Resolution> {
        match self.catalog.get(name) {
            Some(record) => {
                debug!(region = name, "resolved region explicitly");
                Ok(Resolution {
                    region: name.to_string(),
                    locator: self.archive.ept_url(name),
                    candidates: vec![record.clone()],
                })
            }
            None => Err(Error::RegionNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Bounds-search mode: pick among regions that fully contain `bounds`.
    ///
    /// Selection is deterministic: smallest bbox area wins, ties broken by
    /// catalog order. The full candidate set is kept on the resolution in
    /// selection order so callers can inspect alternatives.
    pub fn resolve_bounds(&self, bounds: &BBox) -> Result<Resolution> {
        let mut candidates: Vec<(usize, &RegionRecord)> = self
            .catalog
            .find_covering(bounds)
            .into_iter()
            .enumerate()
            .collect();

        if candidates.is_empty() {
            return Err(Error::NoRegionCovers {
                min_x: bounds.min_x,
                min_y: bounds.min_y,
                max_x: bounds.max_x,
                max_y: bounds.max_y,
            });
        }

        candidates.sort_by(|(ia, a), (ib, b)| {
            a.bbox()
                .area()
                .partial_cmp(&b.bbox().area())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        });

        let chosen = candidates[0].1.region.clone();
        debug!(
            region = %chosen,
            candidates = candidates.len(),
            "resolved region from bounds"
        );

        Ok(Resolution {
            locator: self.archive.ept_url(&chosen),
            region: chosen,
            candidates: candidates.into_iter().map(|(_, r)| r.clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> RegionRecord {
        RegionRecord {
            filename: format!("{region}/"),
            region: region.to_string(),
            year: String::new(),
            xmin,
            xmax,
            ymin,
            ymax,
            points: 1,
        }
    }

    fn catalog() -> RegionCatalog {
        RegionCatalog::from_records(vec![
            record("big", -100.0, -100.0, 100.0, 100.0),
            record("small", -10.0, -10.0, 10.0, 10.0),
            record("east", 50.0, -10.0, 90.0, 10.0),
        ])
    }

    #[test]
    fn explicit_present_returns_name_unchanged() {
        let catalog = catalog();
        let archive = ArchiveBase::new("https://example.com/pc");
        let resolver = RegionResolver::new(&catalog, &archive);

        let res = resolver.resolve_explicit("small").unwrap();
        assert_eq!(res.region, "small");
        assert_eq!(res.locator, "https://example.com/pc/small/ept.json");
        assert_eq!(res.candidates.len(), 1);
    }

    #[test]
    fn explicit_absent_fails_without_search() {
        let catalog = catalog();
        let archive = ArchiveBase::default();
        let resolver = RegionResolver::new(&catalog, &archive);

        // Bounds inside "small" exist, but explicit mode must not fall back.
        let err = resolver.resolve_explicit("missing").unwrap_err();
        assert!(matches!(err, Error::RegionNotFound { name } if name == "missing"));
    }

    #[test]
    fn bounds_empty_result_is_an_error() {
        let catalog = catalog();
        let archive = ArchiveBase::default();
        let resolver = RegionResolver::new(&catalog, &archive);

        let err = resolver
            .resolve_bounds(&BBox::new(500.0, 500.0, 501.0, 501.0))
            .unwrap_err();
        assert!(matches!(err, Error::NoRegionCovers { .. }));
    }

    #[test]
    fn bounds_prefers_smallest_area() {
        let catalog = catalog();
        let archive = ArchiveBase::default();
        let resolver = RegionResolver::new(&catalog, &archive);

        // Covered by both "big" and "small"; "small" has the smaller bbox.
        let res = resolver.resolve_bounds(&BBox::new(-1.0, -1.0, 1.0, 1.0)).unwrap();
        assert_eq!(res.region, "small");
        assert_eq!(res.candidates.len(), 2);
        assert_eq!(res.candidates[0].region, "small");
        assert_eq!(res.candidates[1].region, "big");
    }

    #[test]
    fn bounds_area_tie_breaks_by_catalog_order() {
        let catalog = RegionCatalog::from_records(vec![
            record("first", 0.0, 0.0, 10.0, 10.0),
            record("second", 0.0, 0.0, 10.0, 10.0),
        ]);
        let archive = ArchiveBase::default();
        let resolver = RegionResolver::new(&catalog, &archive);

        let res = resolver.resolve_bounds(&BBox::new(1.0, 1.0, 2.0, 2.0)).unwrap();
        assert_eq!(res.region, "first");
    }

    #[test]
    fn resolve_dispatches_on_query() {
        let catalog = catalog();
        let archive = ArchiveBase::default();
        let resolver = RegionResolver::new(&catalog, &archive);

        let explicit = resolver
            .resolve(&RegionQuery::Explicit("east".into()))
            .unwrap();
        assert_eq!(explicit.region, "east");

        let bounds = resolver
            .resolve(&RegionQuery::Bounds(BBox::new(60.0, -5.0, 70.0, 5.0)))
            .unwrap();
        assert_eq!(bounds.region, "east");
    }
}
