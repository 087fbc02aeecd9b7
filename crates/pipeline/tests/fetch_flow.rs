//! End-to-end fetch flow against a stub executor.
//!
//! The stub stands in for the external pipeline runner: it consumes the
//! description like the real one would (reading the `writepoints` slot) and
//! leaves a small LAS file behind, which the fetch flow then reads back as
//! the elevation table.

use std::path::Path;

use eptfetch_core::{ArchiveBase, Crs, Polygon, RegionCatalog, RegionRecord};
use eptfetch_pipeline::{
    fetch_elevation, ExecutionReport, FetchRequest, OutputPaths, PipelineDescription,
    PipelineExecutor, Stage, STAGE_TAGS,
};

/// Executor that writes canned ground points to the pipeline's LAS slot.
struct StubExecutor {
    points: Vec<(f64, f64, f64)>,
}

impl PipelineExecutor for StubExecutor {
    fn execute(
        &self,
        pipeline: &PipelineDescription,
    ) -> eptfetch_pipeline::Result<ExecutionReport> {
        let filename = match pipeline.stage("writepoints") {
            Some(Stage::WriteLas { filename, .. }) => filename.clone(),
            other => panic!("missing writepoints stage: {other:?}"),
        };

        let mut writer =
            las::Writer::from_path(Path::new(&filename), las::Header::default())?;
        for &(x, y, z) in &self.points {
            writer.write_point(las::Point {
                x,
                y,
                z,
                ..Default::default()
            })?;
        }
        writer.close()?;

        Ok(ExecutionReport::default())
    }
}

fn iowa_catalog() -> RegionCatalog {
    RegionCatalog::from_records(vec![
        // Extents in the archive frame (EPSG:3857 metres).
        RegionRecord {
            filename: "IA_FullState/".into(),
            region: "IA_FullState".into(),
            year: String::new(),
            xmin: -10_758_000.0,
            xmax: -10_035_000.0,
            ymin: 4_920_000.0,
            ymax: 5_389_000.0,
            points: 1_365_255_903,
        },
        RegionRecord {
            filename: "MN_RedRiver_1_2008/".into(),
            region: "MN_RedRiver_1_".into(),
            year: "2008".into(),
            xmin: -10_816_265.0,
            xmax: -10_721_796.0,
            ymin: 5_923_766.0,
            ymax: 6_179_619.0,
            points: 128_469_775,
        },
    ])
}

fn ames_request(dir: &Path) -> FetchRequest {
    let polygon = Polygon::rectangle((-93.756155, 41.918015), (-93.747334, 41.921429)).unwrap();
    FetchRequest::new(
        polygon,
        Crs::wgs84(),
        OutputPaths::new(dir.join("ames.las"), dir.join("ames.tif")),
    )
}

#[test]
fn explicit_region_fetch_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = iowa_catalog();
    let archive = ArchiveBase::usgs_3dep();

    let executor = StubExecutor {
        points: vec![
            (-93.7550, 41.9190, 291.2),
            (-93.7501, 41.9201, 300.5),
            (-93.7489, 41.9210, 296.8),
        ],
    };

    let request = ames_request(dir.path()).with_region("IA_FullState");
    let outcome = fetch_elevation(&catalog, &archive, &request, &executor).unwrap();

    // Explicit mode returns the name unchanged.
    assert_eq!(outcome.region, "IA_FullState");
    assert_eq!(outcome.candidates.len(), 1);

    // The chain is the fixed eight stages.
    let tags: Vec<&str> = outcome.pipeline.stages().iter().map(|s| s.tag()).collect();
    assert_eq!(tags, STAGE_TAGS);

    // Stage 1 reads the region locator, cropped by the reprojected bbox.
    match outcome.pipeline.stage("readdata").unwrap() {
        Stage::ReadEpt {
            filename, bounds, ..
        } => {
            assert_eq!(
                filename,
                "https://s3-us-west-2.amazonaws.com/usgs-lidar-public/IA_FullState/ept.json"
            );
            // (-93.756155, 41.918015) in EPSG:3857 is about
            // (-10436887, 5148707); the crop window must be metres.
            assert!(bounds.starts_with("([-10436887."), "bounds {bounds}");
            assert!(bounds.contains("5148706.") || bounds.contains("5148707."), "bounds {bounds}");
        }
        other => panic!("unexpected stage {other:?}"),
    }

    // The stub's points came back as the elevation table, in the request CRS.
    assert_eq!(outcome.elevations.len(), 3);
    assert_eq!(outcome.elevations.crs(), Crs::wgs84());
    let (lo, hi) = outcome.elevations.elevation_range().unwrap();
    assert!((lo - 291.2).abs() < 0.01, "lo {lo}");
    assert!((hi - 300.5).abs() < 0.01, "hi {hi}");
}

#[test]
fn bounds_mode_selects_covering_region() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = iowa_catalog();
    let archive = ArchiveBase::usgs_3dep();

    let executor = StubExecutor {
        points: vec![(-93.75, 41.92, 295.0)],
    };

    // No explicit region: the polygon's archive-frame bounds fall inside
    // IA_FullState only.
    let request = ames_request(dir.path());
    let outcome = fetch_elevation(&catalog, &archive, &request, &executor).unwrap();

    assert_eq!(outcome.region, "IA_FullState");
    assert_eq!(outcome.candidates.len(), 1);
    assert_eq!(outcome.elevations.len(), 1);
}
