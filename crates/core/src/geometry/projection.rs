//! Pure-Rust reprojection between the supported frames (Snyder 1987, USGS
//! formulas).
//!
//! Supported: WGS84 geographic (EPSG:4326), spherical Web Mercator
//! (EPSG:3857), and UTM North/South (EPSG 326xx / 327xx). All pairs compose
//! through a WGS84 hub, so a UTM polygon can be taken straight into the
//! archive frame. No external C dependencies (no libproj).

use geo_types::Coord;

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::geometry::{BBox, Polygon};

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

// Spherical Web Mercator radius and latitude cutoff.
const R_MERC: f64 = 6_378_137.0;
const MERC_MAX_LAT: f64 = 85.051_128_779_806_59;

// ── Public API ───────────────────────────────────────────────────────────

/// Reproject a polygon's exterior ring vertex by vertex.
///
/// Fails with [`Error::InvalidGeometry`] if either CRS is unsupported or a
/// vertex falls outside the projectable domain.
pub fn project_polygon(polygon: &Polygon, from: &Crs, to: &Crs) -> Result<Polygon> {
    if from == to {
        return Ok(polygon.clone());
    }

    let ring = polygon
        .exterior()
        .iter()
        .map(|c| project_point(*c, from, to))
        .collect::<Result<Vec<_>>>()?;

    Polygon::new(ring)
}

/// Reproject a polygon and return the envelope of the projected ring.
///
/// Every vertex is transformed before taking the envelope; projecting only
/// the corners of the source envelope would understate the extent under
/// non-linear transforms.
pub fn project_bounds(polygon: &Polygon, from: &Crs, to: &Crs) -> Result<BBox> {
    Ok(project_polygon(polygon, from, to)?.bbox())
}

/// Reproject a single coordinate.
pub fn project_point(point: Coord<f64>, from: &Crs, to: &Crs) -> Result<Coord<f64>> {
    if from == to {
        return Ok(point);
    }
    let (lon, lat) = to_wgs84(point.x, point.y, from)?;
    let (x, y) = from_wgs84(lon, lat, to)?;
    Ok(Coord { x, y })
}

/// Parse an EPSG code into UTM zone info: `Some((zone, is_north))`.
///
/// - EPSG 326xx → zone xx, North hemisphere
/// - EPSG 327xx → zone xx, South hemisphere
pub fn parse_utm_epsg(epsg: u32) -> Option<(u32, bool)> {
    if (32601..=32660).contains(&epsg) {
        Some((epsg - 32600, true))
    } else if (32701..=32760).contains(&epsg) {
        Some((epsg - 32700, false))
    } else {
        None
    }
}

/// Whether this crate can transform coordinates in the given CRS.
pub fn is_supported(crs: &Crs) -> bool {
    let epsg = crs.epsg();
    epsg == 4326 || epsg == 3857 || parse_utm_epsg(epsg).is_some()
}

// ── Hub dispatch ─────────────────────────────────────────────────────────

fn to_wgs84(x: f64, y: f64, from: &Crs) -> Result<(f64, f64)> {
    match from.epsg() {
        4326 => Ok((x, y)),
        3857 => Ok(mercator_to_wgs84(x, y)),
        epsg => match parse_utm_epsg(epsg) {
            Some((zone, north)) => Ok(utm_to_wgs84(x, y, zone, north)),
            None => Err(unsupported(from)),
        },
    }
}

fn from_wgs84(lon: f64, lat: f64, to: &Crs) -> Result<(f64, f64)> {
    match to.epsg() {
        4326 => Ok((lon, lat)),
        3857 => wgs84_to_mercator(lon, lat),
        epsg => match parse_utm_epsg(epsg) {
            Some((zone, north)) => Ok(wgs84_to_utm(lon, lat, zone, north)),
            None => Err(unsupported(to)),
        },
    }
}

fn unsupported(crs: &Crs) -> Error {
    Error::invalid_geometry(format!("unsupported CRS {crs}"))
}

// ── Web Mercator (spherical) ─────────────────────────────────────────────

fn wgs84_to_mercator(lon_deg: f64, lat_deg: f64) -> Result<(f64, f64)> {
    if lat_deg.abs() > MERC_MAX_LAT {
        return Err(Error::invalid_geometry(format!(
            "latitude {lat_deg} outside Web Mercator domain (|lat| <= {MERC_MAX_LAT})"
        )));
    }
    let x = R_MERC * lon_deg.to_radians();
    let y = R_MERC * (std::f64::consts::FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln();
    Ok((x, y))
}

fn mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / R_MERC).to_degrees();
    let lat = (2.0 * (y / R_MERC).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

// ── UTM forward (Snyder 1987, USGS Prof. Paper 1395, pp. 61-64) ─────────

/// Convert WGS84 (longitude, latitude) in degrees to UTM (easting, northing)
/// in metres for the given zone and hemisphere.
fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();

    let lon0 = central_meridian(zone);

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a_coeff = cos_lat * (lon - lon0);

    // Meridional arc length M (Snyder eq. 3-21)
    let m = meridional_arc(lat);

    let a2 = a_coeff * a_coeff;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    // Easting (Snyder eq. 8-9)
    let easting = K0 * n
        * (a_coeff
            + (1.0 - t + c) * a2 * a_coeff / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2)
                * a4
                * a_coeff
                / 120.0)
        + FALSE_EASTING;

    // Northing (Snyder eq. 8-10)
    let northing = K0
        * (m
            + n * tan_lat
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    let northing = if north {
        northing
    } else {
        northing + FALSE_NORTHING_SOUTH
    };

    (easting, northing)
}

// ── UTM inverse (Snyder eqs. 8-17 .. 8-25) ──────────────────────────────

/// Convert UTM (easting, northing) in metres back to WGS84 (longitude,
/// latitude) in degrees.
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - FALSE_NORTHING_SOUTH
    };

    let m = y / K0;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * E2 * E2 / 64.0 - 5.0 * E2 * E2 * E2 / 256.0));

    // Footpoint latitude (Snyder eq. 3-26)
    let sqrt_one_minus_e2 = (1.0 - E2).sqrt();
    let e1 = (1.0 - sqrt_one_minus_e2) / (1.0 + sqrt_one_minus_e2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_2 * e1_2;

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let one_minus = 1.0 - E2 * sin_phi1 * sin_phi1;
    let n1 = A / one_minus.sqrt();
    let r1 = A * (1.0 - E2) / (one_minus * one_minus.sqrt());
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d2 * d2;
    let d5 = d4 * d;
    let d6 = d4 * d2;

    // Latitude (Snyder eq. 8-17)
    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * E_PRIME2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    // Longitude (Snyder eq. 8-18)
    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                * d5
                / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

/// Central meridian of a UTM zone, in radians.
fn central_meridian(zone: u32) -> f64 {
    ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
}

/// Meridional arc from equator to latitude `lat` (radians).
/// Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e2 = E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

// ── Tests ────────────────────────────────────────────────────────────────
