//! One-shot fetch orchestration.
//!
//! A [`FetchRequest`] is an explicit, immutable per-call context: the
//! polygon and CRS the caller supplied, the optional region override, and
//! the output paths. Everything derived from it (archive-frame bounds, crop
//! WKT, the pipeline) is computed here and threaded through the resolver
//! and builder; nothing carries over between calls.

use eptfetch_core::geometry::projection::project_polygon;
use eptfetch_core::{ArchiveBase, Crs, Polygon, RegionCatalog, RegionRecord, RegionResolver};
use tracing::info;

use crate::builder::{build_fetch_pipeline, OutputPaths, RasterOptions};
use crate::description::PipelineDescription;
use crate::elevation::{read_elevations, ElevationTable};
use crate::error::Result;
use crate::executor::PipelineExecutor;

/// Everything one fetch call needs; owned by the call, dropped with it.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Area of interest in `crs`.
    pub polygon: Polygon,
    /// CRS of `polygon`, and the frame of the returned elevations.
    pub crs: Crs,
    /// Explicit region name; `None` selects bounds-search mode.
    pub region: Option<String>,
    pub output: OutputPaths,
    pub raster: RasterOptions,
}

impl FetchRequest {
    pub fn new(polygon: Polygon, crs: Crs, output: OutputPaths) -> Self {
        Self {
            polygon,
            crs,
            region: None,
            output,
            raster: RasterOptions::default(),
        }
    }

    /// Pin the request to a named region instead of searching by bounds.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_raster_options(mut self, raster: RasterOptions) -> Self {
        self.raster = raster;
        self
    }
}

/// Result of a completed fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Region the data came from.
    pub region: String,
    /// Covering regions that also qualified (bounds mode), selection order.
    pub candidates: Vec<RegionRecord>,
    /// The pipeline that ran.
    pub pipeline: PipelineDescription,
    /// Ground elevations in the request CRS.
    pub elevations: ElevationTable,
}

/// Build the pipeline for a request without running it.
///
/// Useful for inspection and for `--dry-run` surfaces; the returned
/// resolution and description are exactly what [`fetch_elevation`] would
/// execute.
pub fn plan_fetch(
    catalog: &RegionCatalog,
    archive: &ArchiveBase,
    request: &FetchRequest,
) -> Result<(eptfetch_core::Resolution, PipelineDescription)> {
    let archive_crs = Crs::archive();
    let crop = project_polygon(&request.polygon, &request.crs, &archive_crs)?;
    let bounds = crop.bbox();

    let resolver = RegionResolver::new(catalog, archive);
    let resolution = match &request.region {
        Some(name) => resolver.resolve_explicit(name)?,
        None => resolver.resolve_bounds(&bounds)?,
    };

    let pipeline = build_fetch_pipeline(
        &resolution.locator,
        &bounds,
        Some(&crop.to_wkt()),
        &request.crs,
        &request.output,
        &request.raster,
    )?;

    Ok((resolution, pipeline))
}

/// Run the full acquisition: resolve, build, execute, read elevations.
pub fn fetch_elevation(
    catalog: &RegionCatalog,
    archive: &ArchiveBase,
    request: &FetchRequest,
    executor: &dyn PipelineExecutor,
) -> Result<FetchOutcome> {
    let (resolution, pipeline) = plan_fetch(catalog, archive, request)?;
    info!(region = %resolution.region, "fetching point data");

    executor.execute(&pipeline)?;
    let elevations = read_elevations(&request.output.points, request.crs)?;
    info!(points = elevations.len(), "fetch complete");

    Ok(FetchOutcome {
        region: resolution.region,
        candidates: resolution.candidates,
        pipeline,
        elevations,
    })
}

// Sanity check that the derived bounds reach the read stage; the full
// scenario lives in tests/fetch_flow.rs.
#[cfg(test)]
mod tests {
    use super::*;
    use eptfetch_core::RegionRecord;

    fn catalog() -> RegionCatalog {
        RegionCatalog::from_records(vec![RegionRecord {
            filename: "IA_FullState/".into(),
            region: "IA_FullState".into(),
            year: String::new(),
            xmin: -10_758_000.0,
            xmax: -10_035_000.0,
            ymin: 4_920_000.0,
            ymax: 5_389_000.0,
            points: 1_365_255_903,
        }])
    }

    fn request() -> FetchRequest {
        let polygon =
            Polygon::rectangle((-93.756155, 41.918015), (-93.747334, 41.921429)).unwrap();
        FetchRequest::new(
            polygon,
            Crs::wgs84(),
            OutputPaths::new("iowa.las", "iowa.tif"),
        )
    }

    #[test]
    fn plan_projects_bounds_into_archive_frame() {
        let catalog = catalog();
        let archive = ArchiveBase::new("https://example.com/pc");

        let (resolution, pipeline) = plan_fetch(&catalog, &archive, &request()).unwrap();
        assert_eq!(resolution.region, "IA_FullState");

        match pipeline.stage("readdata").unwrap() {
            crate::stage::Stage::ReadEpt { bounds, .. } => {
                // Archive-frame metres, not degrees.
                assert!(bounds.contains("-104368"), "bounds {bounds}");
            }
            other => panic!("unexpected stage {other:?}"),
        }
    }

    #[test]
    fn plan_honours_explicit_region() {
        let catalog = catalog();
        let archive = ArchiveBase::new("https://example.com/pc");

        let (resolution, _) = plan_fetch(
            &catalog,
            &archive,
            &request().with_region("IA_FullState"),
        )
        .unwrap();
        assert_eq!(resolution.region, "IA_FullState");
        assert_eq!(
            resolution.locator,
            "https://example.com/pc/IA_FullState/ept.json"
        );
    }

    #[test]
    fn plan_fails_for_unknown_explicit_region() {
        let catalog = catalog();
        let archive = ArchiveBase::default();

        let err = plan_fetch(
            &catalog,
            &archive,
            &request().with_region("MT_Nowhere"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::PipelineError::Core(eptfetch_core::Error::RegionNotFound { .. })
        ));
    }

    #[test]
    fn plan_fails_when_nothing_covers() {
        // Catalog bbox far from the polygon.
        let catalog = RegionCatalog::from_records(vec![RegionRecord {
            filename: "X/".into(),
            region: "X".into(),
            year: String::new(),
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            points: 1,
        }]);
        let archive = ArchiveBase::default();

        let err = plan_fetch(&catalog, &archive, &request()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PipelineError::Core(eptfetch_core::Error::NoRegionCovers { .. })
        ));
    }
}
