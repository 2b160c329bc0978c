//! Spherical ring area.
//!
//! Uses the spherical-excess approximation from Chamberlain & Duquette,
//! "Some Algorithms for Polygons on a Sphere" (JPL, 2007), on a sphere with
//! the WGS84 equatorial radius. This matches what web map tooling reports
//! for drawn shapes.

use geo::ChamberlainDuquetteArea;

use super::geometry::{to_polygon, validate_ring, GeometryError, Position};

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Area enclosed by a ring, in hectares rounded to 4 decimal places.
///
/// Open rings are closed first. Direction does not matter. A ring that
/// rounds to zero hectares is rejected as degenerate.
pub fn compute_enclosed_area(ring: &[Position]) -> Result<f64, GeometryError> {
    let closed = validate_ring(ring)?;
    let square_meters = to_polygon(&closed).chamberlain_duquette_unsigned_area();
    let hectares = round4(square_meters / SQUARE_METERS_PER_HECTARE);
    if hectares == 0.0 {
        return Err(GeometryError::Degenerate);
    }
    Ok(hectares)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
