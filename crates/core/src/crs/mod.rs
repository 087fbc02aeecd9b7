//! Coordinate Reference System handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// EPSG code of the archive's native frame (spherical Web Mercator).
///
/// Catalog bounds and read-stage crop windows are always expressed in this
/// frame; the output reprojection target is a separate, per-request CRS.
pub const ARCHIVE_EPSG: u32 = 3857;

/// Coordinate Reference System representation, EPSG-centric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// The archive's native frame.
    pub fn archive() -> Self {
        Self::from_epsg(ARCHIVE_EPSG)
    }

    /// Get the EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Authority-prefixed identifier, e.g. `"EPSG:4326"`.
    ///
    /// This is the spelling the pipeline's reprojection stage expects.
    pub fn authority_code(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// Parse a CRS identifier: a bare EPSG code (`"4326"`) or the
    /// authority-prefixed form (`"EPSG:4326"`, case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = trimmed
            .strip_prefix("EPSG:")
            .or_else(|| trimmed.strip_prefix("epsg:"))
            .unwrap_or(trimmed);
        code.parse::<u32>()
            .map(Self::from_epsg)
            .map_err(|_| Error::invalid_geometry(format!("unresolvable CRS identifier '{s}'")))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.authority_code())
    }
}

impl FromStr for Crs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}
