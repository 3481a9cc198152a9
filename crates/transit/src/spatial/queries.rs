//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Convert meters to degrees at the equator (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Degree-space search radius guaranteed to cover everything within
/// `meters` of a point at the given latitude.
///
/// Longitude degrees shrink with cos(latitude), so the equator conversion
/// alone would under-cover away from it. The radius is scaled up instead;
/// the Haversine pass discards the overshoot. The cosine is clamped so the
/// radius stays finite near the poles (no transit network lives there).
pub fn prefilter_radius_degrees(meters: f64, latitude: f64) -> f64 {
    let cos_lat = latitude.to_radians().cos().max(0.05);
    meters_to_degrees_approx(meters) * std::f64::consts::SQRT_2 / cos_lat
}
