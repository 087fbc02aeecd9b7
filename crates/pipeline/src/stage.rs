//! Typed stages of the point-cloud pipeline.
//!
//! Each variant is one operation the external executor understands; the
//! serde representation matches the executor's JSON stage objects
//! (`{"type": "...", "tag": "...", "inputs": [...], ...params}`).

use serde::Serialize;

/// One named processing step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stage {
    /// Read from an Entwine Point Tile dataset, cropped to `bounds` (archive
    /// frame) and optionally clipped tighter by a `polygon` WKT.
    #[serde(rename = "readers.ept")]
    ReadEpt {
        tag: String,
        filename: String,
        bounds: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        polygon: Option<String>,
    },

    /// Keep or drop points by dimension range, e.g.
    /// `Classification![7:7]` (drop class 7) or `Classification[2:2]`.
    #[serde(rename = "filters.range")]
    Range {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        inputs: Vec<String>,
        limits: String,
    },

    /// Overwrite a dimension, e.g. `Classification[:]=0`.
    #[serde(rename = "filters.assign")]
    Assign {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        inputs: Vec<String>,
        assignment: String,
    },

    /// Reproject coordinates to `out_srs`.
    #[serde(rename = "filters.reprojection")]
    Reproject {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        inputs: Vec<String>,
        out_srs: String,
    },

    /// Ground classification (Simple Morphological Filter).
    #[serde(rename = "filters.smrf")]
    Smrf {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        inputs: Vec<String>,
    },

    /// Persist points to a LAS file.
    #[serde(rename = "writers.las")]
    WriteLas {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        inputs: Vec<String>,
        filename: String,
    },

    /// Interpolate an elevation surface from the points.
    #[serde(rename = "writers.gdal")]
    WriteGdal {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        inputs: Vec<String>,
        filename: String,
        gdaldriver: String,
        output_type: String,
        resolution: f64,
        window_size: u32,
        nodata: f64,
    },
}

impl Stage {
    /// The stage's unique tag within its pipeline.
    pub fn tag(&self) -> &str {
        match self {
            Stage::ReadEpt { tag, .. }
            | Stage::Range { tag, .. }
            | Stage::Assign { tag, .. }
            | Stage::Reproject { tag, .. }
            | Stage::Smrf { tag, .. }
            | Stage::WriteLas { tag, .. }
            | Stage::WriteGdal { tag, .. } => tag,
        }
    }

    /// Tags of the stages this one consumes. Readers have none.
    pub fn inputs(&self) -> &[String] {
        match self {
            Stage::ReadEpt { .. } => &[],
            Stage::Range { inputs, .. }
            | Stage::Assign { inputs, .. }
            | Stage::Reproject { inputs, .. }
            | Stage::Smrf { inputs, .. }
            | Stage::WriteLas { inputs, .. }
            | Stage::WriteGdal { inputs, .. } => inputs,
        }
    }

    /// The executor-facing operation name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::ReadEpt { .. } => "readers.ept",
            Stage::Range { .. } => "filters.range",
            Stage::Assign { .. } => "filters.assign",
            Stage::Reproject { .. } => "filters.reprojection",
            Stage::Smrf { .. } => "filters.smrf",
            Stage::WriteLas { .. } => "writers.las",
            Stage::WriteGdal { .. } => "writers.gdal",
        }
    }
}
