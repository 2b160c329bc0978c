//! Geographic primitives for claim boundaries.
//!
//! Rings arrive from the map as `[longitude, latitude]` pairs in degrees.
//! This module validates them, closes them, and measures the enclosed area
//! on a spherical earth model.

mod area;
mod feature;
mod geometry;

pub use area::compute_enclosed_area;
pub use feature::{Feature, FeatureCollection};
pub use geometry::{validate_ring, Geometry, GeometryError, Position};
