//! Assembly of the fixed fetch pipeline.
//!
//! The chain is always the same eight stages in the same order;
//! reprojection must run before rasterization so the output grid units
//! match the target CRS. Only the per-request slots vary: the read locator
//! and crop window, the output SRS, and the two output paths.

use std::path::PathBuf;

use eptfetch_core::{BBox, Crs};

use crate::description::PipelineDescription;
use crate::error::{PipelineError, Result};
use crate::stage::Stage;

/// ASPRS classification code the archive uses for low noise.
const NOISE_CLASS: u8 = 7;

/// ASPRS classification code for ground points.
const GROUND_CLASS: u8 = 2;

/// Tags of the fetch chain, in execution order.
pub const STAGE_TAGS: [&str; 8] = [
    "readdata",
    "nonoise",
    "declassify",
    "reproject",
    "groundify",
    "keepground",
    "writepoints",
    "rasterize",
];

/// Destination files for a fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    /// Filtered ground points (LAS).
    pub points: PathBuf,
    /// Interpolated elevation surface (GeoTIFF).
    pub raster: PathBuf,
}

impl OutputPaths {
    pub fn new(points: impl Into<PathBuf>, raster: impl Into<PathBuf>) -> Self {
        Self {
            points: points.into(),
            raster: raster.into(),
        }
    }
}

/// Rasterization parameters for the final stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Output cell size in target-CRS units.
    pub resolution: f64,
    /// Interpolation window size in cells.
    pub window_size: u32,
    /// Sentinel written to cells with no contributing points.
    pub nodata: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            window_size: 6,
            nodata: -9999.0,
        }
    }
}

/// Build the fetch pipeline for one request.
///
/// `locator` is the region's EPT descriptor URL, `bounds` the crop window in
/// the archive frame, `crop_wkt` an optional polygon (archive frame) for
/// clipping tighter than the bbox, and `target_crs` the caller's output
/// frame. Missing or degenerate slots fail with
/// [`PipelineError::Template`].
pub fn build_fetch_pipeline(
    locator: &str,
    bounds: &BBox,
    crop_wkt: Option<&str>,
    target_crs: &Crs,
    output: &OutputPaths,
    raster: &RasterOptions,
) -> Result<PipelineDescription> {
    if locator.is_empty() {
        return Err(PipelineError::template("read stage requires a locator"));
    }
    if bounds.is_degenerate() {
        return Err(PipelineError::template(format!(
            "read stage requires non-degenerate bounds, got {}",
            bounds.crop_window()
        )));
    }
    if let Some(wkt) = crop_wkt {
        if wkt.is_empty() {
            return Err(PipelineError::template("crop polygon is empty"));
        }
    }
    let points_file = path_slot(&output.points, "points output path")?;
    let raster_file = path_slot(&output.raster, "raster output path")?;
    if raster.resolution <= 0.0 {
        return Err(PipelineError::template(format!(
            "raster resolution must be positive, got {}",
            raster.resolution
        )));
    }
    if raster.window_size == 0 {
        return Err(PipelineError::template("raster window size must be positive"));
    }

    let stages = vec![
        Stage::ReadEpt {
            tag: STAGE_TAGS[0].into(),
            filename: locator.to_string(),
            bounds: bounds.crop_window(),
            polygon: crop_wkt.map(str::to_string),
        },
        Stage::Range {
            tag: STAGE_TAGS[1].into(),
            inputs: vec![STAGE_TAGS[0].into()],
            limits: format!("Classification![{NOISE_CLASS}:{NOISE_CLASS}]"),
        },
        Stage::Assign {
            tag: STAGE_TAGS[2].into(),
            inputs: vec![STAGE_TAGS[1].into()],
            assignment: "Classification[:]=0".into(),
        },
        Stage::Reproject {
            tag: STAGE_TAGS[3].into(),
            inputs: vec![STAGE_TAGS[2].into()],
            out_srs: target_crs.authority_code(),
        },
        Stage::Smrf {
            tag: STAGE_TAGS[4].into(),
            inputs: vec![STAGE_TAGS[3].into()],
        },
        Stage::Range {
            tag: STAGE_TAGS[5].into(),
            inputs: vec![STAGE_TAGS[4].into()],
            limits: format!("Classification[{GROUND_CLASS}:{GROUND_CLASS}]"),
        },
        Stage::WriteLas {
            tag: STAGE_TAGS[6].into(),
            inputs: vec![STAGE_TAGS[5].into()],
            filename: points_file,
        },
        Stage::WriteGdal {
            tag: STAGE_TAGS[7].into(),
            inputs: vec![STAGE_TAGS[6].into()],
            filename: raster_file,
            gdaldriver: "GTiff".into(),
            output_type: "idw".into(),
            resolution: raster.resolution,
            window_size: raster.window_size,
            nodata: raster.nodata,
        },
    ];

    PipelineDescription::new(stages)
}

fn path_slot(path: &std::path::Path, what: &str) -> Result<String> {
    let s = path.to_string_lossy();
    if s.is_empty() {
        return Err(PipelineError::template(format!("{what} is empty")));
    }
    Ok(s.into_owned())
}
