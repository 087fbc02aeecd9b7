//! Elevation extraction from the pipeline's point output.
//!
//! After a successful run, the `writepoints` stage has left a LAS file of
//! ground points in the request CRS; this module reads it back into the
//! caller-facing elevation table.

use std::path::Path;

use eptfetch_core::Crs;
use tracing::debug;

use crate::error::Result;

/// One ground point: elevation plus its 2D position in the request CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationPoint {
    pub elevation: f64,
    pub x: f64,
    pub y: f64,
}

/// The caller-facing result table.
#[derive(Debug, Clone)]
pub struct ElevationTable {
    crs: Crs,
    points: Vec<ElevationPoint>,
}

impl ElevationTable {
    pub fn new(crs: Crs, points: Vec<ElevationPoint>) -> Self {
        Self { crs, points }
    }

    /// CRS the point geometries are expressed in.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn points(&self) -> &[ElevationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElevationPoint> {
        self.points.iter()
    }

    /// (min, max) elevation, or `None` for an empty table.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.elevation, p.elevation)),
            Some((lo, hi)) => Some((lo.min(p.elevation), hi.max(p.elevation))),
        })
    }
}

/// Read the written LAS point file into an elevation table.
pub fn read_elevations(path: &Path, crs: Crs) -> Result<ElevationTable> {
    let mut reader = las::Reader::from_path(path)?;

    let mut points = Vec::new();
    for point in reader.points() {
        let point = point?;
        points.push(ElevationPoint {
            elevation: point.z,
            x: point.x,
            y: point.y,
        });
    }

    debug!(count = points.len(), path = %path.display(), "read elevation points");
    Ok(ElevationTable::new(crs, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_range() {
        let table = ElevationTable::new(
            Crs::wgs84(),
            vec![
                ElevationPoint { elevation: 290.1, x: 0.0, y: 0.0 },
                ElevationPoint { elevation: 312.7, x: 1.0, y: 1.0 },
                ElevationPoint { elevation: 301.4, x: 2.0, y: 2.0 },
            ],
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.elevation_range(), Some((290.1, 312.7)));
    }

    #[test]
    fn empty_table() {
        let table = ElevationTable::new(Crs::wgs84(), vec![]);
        assert!(table.is_empty());
        assert_eq!(table.elevation_range(), None);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_elevations(Path::new("/not/a/file.las"), Crs::wgs84()).is_err());
    }
}
