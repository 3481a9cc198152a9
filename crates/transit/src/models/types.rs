//! Core data types for the transit network.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::{LineString, Point};

use crate::identifiers::*;
use crate::models::color::LineColor;

// ============================================================================
// Network Entities
// ============================================================================

/// A fixed, named point on a transit line.
///
/// Immutable once loaded. `line_id` always names the owning [`Line`];
/// [`Line::new`] rewrites it so a station cannot claim a foreign owner.
#[derive(Clone, Debug)]
pub struct Station {
    pub id: StationIdentifier,
    pub name: Arc<str>,
    pub location: Point,
    pub line_id: LineIdentifier,
}

impl Station {
    pub fn new(
        id: StationIdentifier,
        name: impl AsRef<str>,
        location: Point,
        line_id: LineIdentifier,
    ) -> Self {
        Self {
            id,
            name: name.as_ref().into(),
            location,
            line_id,
        }
    }
}

/// A transit line: a display color and its stations in physical route order.
///
/// The station order is display-only; snapping never depends on it.
#[derive(Clone, Debug)]
pub struct Line {
    pub id: LineIdentifier,
    pub name: Arc<str>,
    pub color: LineColor,
    pub stations: Vec<Arc<Station>>,
    /// Physical path of the line, for export/display. May be absent.
    pub geometry: Option<LineString>,
}

impl Line {
    pub fn new(
        id: LineIdentifier,
        name: impl AsRef<str>,
        color: LineColor,
        stations: Vec<Station>,
        geometry: Option<LineString>,
    ) -> Self {
        let stations = stations
            .into_iter()
            .map(|mut station| {
                station.line_id = id.clone();
                Arc::new(station)
            })
            .collect();

        Self {
            id,
            name: name.as_ref().into(),
            color,
            stations,
            geometry,
        }
    }
}

// ============================================================================
// Waypoints and Snapping Results
// ============================================================================

/// A single timestamped geographic point from a recorded travel path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub location: Point,
    pub time: DateTime<Utc>,
}

impl Waypoint {
    pub fn new(location: Point, time: DateTime<Utc>) -> Self {
        Self { location, time }
    }
}

/// A successful station assignment for one waypoint.
#[derive(Clone, Debug)]
pub struct Snap {
    pub station: Arc<Station>,
    pub distance_m: f64,
}

/// Outcome of snapping one waypoint: the waypoint itself plus the nearest
/// station within the configured bound, if any. "No match" is a valid
/// result, not an error.
#[derive(Clone, Debug)]
pub struct SnapResult {
    pub waypoint: Waypoint,
    pub snap: Option<Snap>,
}

impl SnapResult {
    pub fn is_match(&self) -> bool {
        self.snap.is_some()
    }

    pub fn station(&self) -> Option<&Arc<Station>> {
        self.snap.as_ref().map(|snap| &snap.station)
    }
}

// ============================================================================
// Validation and Errors
// ============================================================================

/// Check that a point holds a plausible WGS84 coordinate.
///
/// Rejects NaN/infinite values and out-of-range latitudes or longitudes.
pub fn validate_coordinate(point: Point) -> Result<()> {
    let (lon, lat) = (point.x(), point.y());

    let in_range = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);

    if !in_range {
        return Err(TransitError::InvalidCoordinate { lat, lon });
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("invalid coordinate: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[cfg(feature = "loom")]
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    #[cfg(feature = "loom")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_claims_station_ownership() {
        let station = Station::new(
            StationIdentifier::new("s1"),
            "Marienplatz",
            Point::new(11.5756, 48.1374),
            LineIdentifier::new("somewhere_else"),
        );

        let line = Line::new(
            LineIdentifier::new("u3"),
            "U3",
            LineColor::FALLBACK,
            vec![station],
            None,
        );

        assert_eq!(line.stations[0].line_id, LineIdentifier::new("u3"));
    }

    #[test]
    fn test_validate_coordinate_accepts_wgs84_range() {
        assert!(validate_coordinate(Point::new(-73.9855, 40.7580)).is_ok());
        assert!(validate_coordinate(Point::new(-180.0, -90.0)).is_ok());
        assert!(validate_coordinate(Point::new(180.0, 90.0)).is_ok());
    }

    #[test]
    fn test_validate_coordinate_rejects_bad_input() {
        assert!(validate_coordinate(Point::new(f64::NAN, 40.0)).is_err());
        assert!(validate_coordinate(Point::new(-74.0, f64::INFINITY)).is_err());
        assert!(validate_coordinate(Point::new(-74.0, 91.0)).is_err());
        assert!(validate_coordinate(Point::new(181.0, 40.0)).is_err());
    }
}
