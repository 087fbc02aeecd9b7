//! Planar geometry for areas of interest.
//!
//! A fetch request is described by a closed [`Polygon`] in some CRS; the
//! archive is queried with the polygon's axis-aligned [`BBox`] after
//! reprojection into the archive frame.

use geo_types::Coord;

use crate::error::{Error, Result};

pub mod projection;

/// A geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build a bbox from two opposite corners, normalizing min/max.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_y: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_y: a.1.max(b.1),
        }
    }

    /// Envelope of a polygon's exterior ring.
    pub fn from_polygon(polygon: &Polygon) -> Self {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for c in polygon.exterior() {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }

        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Check if two bboxes intersect.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Strict full containment: every edge of `other` lies within `self`.
    pub fn contains(&self, other: &BBox) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// A bbox with zero or negative extent on either axis is degenerate and
    /// cannot be used as a crop window.
    pub fn is_degenerate(&self) -> bool {
        !(self.min_x < self.max_x && self.min_y < self.max_y)
    }

    /// Render as the read stage's crop-window spelling:
    /// `([min_x, max_x], [min_y, max_y])`.
    pub fn crop_window(&self) -> String {
        format!(
            "([{}, {}], [{}, {}])",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// A closed polygon ring.
///
/// The exterior ring is stored closed (first vertex repeated at the end);
/// construction closes an open ring and rejects rings with fewer than three
/// distinct vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<Coord<f64>>,
}

impl Polygon {
    /// Create a polygon from an exterior ring.
    ///
    /// The ring may be given open or closed; fewer than three distinct
    /// vertices is an [`Error::InvalidGeometry`].
    pub fn new(mut exterior: Vec<Coord<f64>>) -> Result<Self> {
        if let (Some(first), Some(last)) = (exterior.first().copied(), exterior.last().copied()) {
            if first != last {
                exterior.push(first);
            }
        }

        let distinct = {
            let mut seen: Vec<Coord<f64>> = Vec::new();
            for c in &exterior {
                if !seen.contains(c) {
                    seen.push(*c);
                }
            }
            seen.len()
        };

        if distinct < 3 {
            return Err(Error::invalid_geometry(format!(
                "polygon ring needs at least 3 distinct vertices, got {distinct}"
            )));
        }

        Ok(Self { exterior })
    }

    /// Create a polygon from `(x, y)` pairs.
    pub fn from_xy(points: &[(f64, f64)]) -> Result<Self> {
        Self::new(points.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    /// Axis-aligned rectangle through two opposite corners.
    pub fn rectangle(a: (f64, f64), b: (f64, f64)) -> Result<Self> {
        Self::from_xy(&[(a.0, a.1), (b.0, a.1), (b.0, b.1), (a.0, b.1)])
    }

    /// The closed exterior ring (first vertex == last vertex).
    pub fn exterior(&self) -> &[Coord<f64>] {
        &self.exterior
    }

    /// Number of stored vertices, including the closing repeat.
    pub fn len(&self) -> usize {
        self.exterior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Envelope of the exterior ring.
    pub fn bbox(&self) -> BBox {
        BBox::from_polygon(self)
    }

    /// WKT rendering, e.g. `POLYGON((0 0, 1 0, 1 1, 0 0))`.
    pub fn to_wkt(&self) -> String {
        let ring = self
            .exterior
            .iter()
            .map(|c| format!("{} {}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(", ");
        format!("POLYGON(({ring}))")
    }
}
