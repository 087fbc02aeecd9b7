//! Entwine Point Tile resource-descriptor models.
//!
//! Lightweight serde models for the `ept.json` each archive region serves,
//! covering the subset the crawler needs: the 3D bounds, the total point
//! count, and the declared SRS.

use serde::{Deserialize, Serialize};

use eptfetch_core::BBox;

/// An `ept.json` resource descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EptResource {
    /// Cubic bounds `[minx, miny, minz, maxx, maxy, maxz]`.
    pub bounds: [f64; 6],

    /// Tight bounds around the actual data, same layout.
    #[serde(rename = "boundsConforming", skip_serializing_if = "Option::is_none")]
    pub bounds_conforming: Option<[f64; 6]>,

    /// Total number of points in the dataset.
    pub points: u64,

    /// Storage encoding, e.g. `"laszip"`.
    #[serde(rename = "dataType", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Voxel span of the octree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub srs: Option<EptSrs>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl EptResource {
    /// 2D extent, preferring the conforming bounds when present.
    pub fn bbox(&self) -> BBox {
        let b = self.bounds_conforming.unwrap_or(self.bounds);
        BBox::new(b[0], b[1], b[3], b[4])
    }

    /// Declared horizontal EPSG code, if the descriptor carries one.
    pub fn horizontal_epsg(&self) -> Option<u32> {
        self.srs
            .as_ref()
            .and_then(|s| s.horizontal.as_deref())
            .and_then(|h| h.parse().ok())
    }
}

/// The `srs` block of a descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EptSrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}
