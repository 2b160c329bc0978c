//! Ring validation and the GeoJSON geometry shapes stored on claims.

use std::collections::HashSet;

use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `[longitude, latitude]` pair in degrees
pub type Position = [f64; 2];

/// Reasons a drawn ring cannot become a claim boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Ring needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),

    #[error("Coordinate {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("Coordinate {index} out of range: longitude {lon}, latitude {lat}")]
    OutOfRange { index: usize, lon: f64, lat: f64 },

    #[error("Ring has {count} points, at most {max} are accepted")]
    TooManyPoints { count: usize, max: usize },

    #[error("Ring encloses no measurable area")]
    Degenerate,

    #[error("Ring edges {first} and {second} cross each other")]
    SelfIntersecting { first: usize, second: usize },
}

/// Geometry shapes accepted on a claim location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    /// Single-ring polygon. The ring is expected to be closed already.
    pub fn polygon(ring: Vec<Position>) -> Self {
        Geometry::Polygon {
            coordinates: vec![ring],
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, Geometry::Polygon { .. })
    }

    /// Outer ring of a polygon
    #[cfg(test)]
    pub fn exterior(&self) -> Option<&[Position]> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
            Geometry::MultiPolygon { .. } => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored location. Unknown shapes yield `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Append the first point when the ring is open.
pub fn close_ring(ring: &[Position]) -> Vec<Position> {
    let mut closed = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            closed.push(*first);
        }
    }
    closed
}

/// Most vertices accepted in one ring. Parcel boundaries drawn on the map
/// stay far below this; the crossing check is quadratic in the edge count.
pub const MAX_RING_POINTS: usize = 2_000;

/// Check coordinates and shape, returning the closed ring.
///
/// Consecutive duplicate points (a double click on the map) are collapsed
/// before the shape checks run.
pub fn validate_ring(ring: &[Position]) -> Result<Vec<Position>, GeometryError> {
    if ring.len() > MAX_RING_POINTS {
        return Err(GeometryError::TooManyPoints {
            count: ring.len(),
            max: MAX_RING_POINTS,
        });
    }

    for (index, [lon, lat]) in ring.iter().enumerate() {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeometryError::NonFinite { index });
        }
        if !(-180.0..=180.0).contains(lon) || !(-90.0..=90.0).contains(lat) {
            return Err(GeometryError::OutOfRange {
                index,
                lon: *lon,
                lat: *lat,
            });
        }
    }

    // Adding 0.0 folds -0.0 into 0.0 so equal coordinates hash equally
    let distinct: HashSet<(u64, u64)> = ring
        .iter()
        .map(|[lon, lat]| ((lon + 0.0).to_bits(), (lat + 0.0).to_bits()))
        .collect();
    if distinct.len() < 3 {
        return Err(GeometryError::TooFewPoints(distinct.len()));
    }

    let mut closed = close_ring(ring);
    closed.dedup();

    if let Some((first, second)) = find_crossing(&closed) {
        return Err(GeometryError::SelfIntersecting { first, second });
    }

    Ok(closed)
}

/// Ring as a `geo` polygon without holes
pub(super) fn to_polygon(closed: &[Position]) -> Polygon<f64> {
    Polygon::new(LineString::from(closed.to_vec()), Vec::new())
}

/// First pair of edges that overlap, or that touch without being neighbours.
///
/// Works in planar degree space, which is adequate for parcel-sized rings
/// that do not span the antimeridian.
fn find_crossing(closed: &[Position]) -> Option<(usize, usize)> {
    let edges: Vec<Line<f64>> = closed
        .windows(2)
        .map(|pair| Line::new(Coord::from(pair[0]), Coord::from(pair[1])))
        .collect();
    let n = edges.len();

    for i in 0..n {
        for j in (i + 1)..n {
            // first and last edge share the closing vertex
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            let hit = match line_intersection(edges[i], edges[j]) {
                None => false,
                Some(LineIntersection::Collinear { intersection }) => {
                    !adjacent || intersection.start != intersection.end
                }
                Some(LineIntersection::SinglePoint { .. }) => !adjacent,
            };
            if hit {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Position> {
        vec![[0.0, 0.0], [0.009, 0.0], [0.009, 0.009], [0.0, 0.009]]
    }

    #[test]
    fn test_close_ring_appends_first_point() {
        let closed = close_ring(&square());
        assert_eq!(closed.len(), 5);
        assert_eq!(closed.first(), closed.last());

        // Already closed rings are left alone
        assert_eq!(close_ring(&closed), closed);
    }

    #[test]
    fn test_validate_rejects_too_few_points() {
        let result = validate_ring(&[[1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(result, Err(GeometryError::TooFewPoints(2)));

        // Repeating points does not make them distinct
        let result = validate_ring(&[[1.0, 1.0], [2.0, 2.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(result, Err(GeometryError::TooFewPoints(2)));

        assert_eq!(validate_ring(&[]), Err(GeometryError::TooFewPoints(0)));
    }

    #[test]
    fn test_validate_rejects_bad_coordinates() {
        let result = validate_ring(&[[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0]]);
        assert_eq!(result, Err(GeometryError::NonFinite { index: 1 }));

        let result = validate_ring(&[[0.0, 0.0], [1.0, 0.0], [181.0, 1.0]]);
        assert!(matches!(result, Err(GeometryError::OutOfRange { index: 2, .. })));

        let result = validate_ring(&[[0.0, 95.0], [1.0, 0.0], [1.0, 1.0]]);
        assert!(matches!(result, Err(GeometryError::OutOfRange { index: 0, .. })));
    }

    #[test]
    fn test_validate_rejects_bowtie() {
        let bowtie = vec![[0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(
            validate_ring(&bowtie),
            Err(GeometryError::SelfIntersecting { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_spike_and_touching_edges() {
        // Walks back along its first edge
        let spike = vec![[0.0, 0.0], [2.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        assert!(matches!(
            validate_ring(&spike),
            Err(GeometryError::SelfIntersecting { .. })
        ));

        // Two loops meeting in one vertex
        let figure_eight = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0], [2.0, 2.0], [1.0, 1.0], [0.0, 2.0]];
        assert!(matches!(
            validate_ring(&figure_eight),
            Err(GeometryError::SelfIntersecting { .. })
        ));

        // Straight runs through a vertex are fine
        let ring = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        assert_eq!(validate_ring(&ring).unwrap().len(), 6);
    }

    #[test]
    fn test_validate_rejects_collinear_ring() {
        // The closing edge runs back over the other two
        let line = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(matches!(
            validate_ring(&line),
            Err(GeometryError::SelfIntersecting { .. })
        ));
    }

    #[test]
    fn test_validate_caps_vertex_count() {
        let circle = |n: usize| -> Vec<Position> {
            (0..n)
                .map(|i| {
                    let angle = i as f64 * std::f64::consts::TAU / n as f64;
                    [81.6 + 0.01 * angle.cos(), 21.2 + 0.01 * angle.sin()]
                })
                .collect()
        };

        assert_eq!(validate_ring(&circle(MAX_RING_POINTS)).unwrap().len(), MAX_RING_POINTS + 1);
        assert_eq!(
            validate_ring(&circle(MAX_RING_POINTS + 1)),
            Err(GeometryError::TooManyPoints {
                count: MAX_RING_POINTS + 1,
                max: MAX_RING_POINTS,
            })
        );
    }

    #[test]
    fn test_distinct_count_ignores_signed_zero() {
        let ring = vec![[0.0, 0.0], [-0.0, 0.0], [1.0, -0.0], [1.0, 0.0]];
        assert_eq!(validate_ring(&ring), Err(GeometryError::TooFewPoints(2)));
    }

    #[test]
    fn test_validate_collapses_double_clicks() {
        let ring = vec![
            [0.0, 0.0],
            [0.009, 0.0],
            [0.009, 0.0],
            [0.009, 0.009],
            [0.0, 0.009],
        ];
        let closed = validate_ring(&ring).unwrap();
        assert_eq!(closed, close_ring(&square()));
    }

    #[test]
    fn test_geometry_json_shape() {
        let geometry = Geometry::polygon(close_ring(&square()));
        let value: serde_json::Value = serde_json::from_str(&geometry.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(value["coordinates"][0][1][0], 0.009);

        let parsed = Geometry::from_json(&geometry.to_json().unwrap()).unwrap();
        assert!(parsed.is_polygon());
        assert_eq!(parsed.exterior().unwrap().len(), 5);
    }

    #[test]
    fn test_unknown_geometry_is_ignored() {
        assert!(Geometry::from_json(r#"{"type":"Point","coordinates":[1.0,2.0]}"#).is_none());
        assert!(Geometry::from_json("not json").is_none());

        let multi = Geometry::from_json(
            r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]}"#,
        )
        .unwrap();
        assert!(!multi.is_polygon());
        assert!(multi.exterior().is_none());
    }
}
