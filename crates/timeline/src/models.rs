//! Normalized timeline activities.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::Point;
use journey_transit::Waypoint;

/// Kind of movement recorded for an activity segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Walking,
    InSubway,
    InTram,
    InBus,
    InPassengerVehicle,
    Other(Arc<str>),
}

impl ActivityType {
    /// Map Google's activity type strings; unrecognized values are kept
    /// verbatim rather than dropped.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "WALKING" => Self::Walking,
            "IN_SUBWAY" => Self::InSubway,
            "IN_TRAM" => Self::InTram,
            "IN_BUS" => Self::InBus,
            "IN_PASSENGER_VEHICLE" => Self::InPassengerVehicle,
            other => Self::Other(other.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Walking => "WALKING",
            Self::InSubway => "IN_SUBWAY",
            Self::InTram => "IN_TRAM",
            Self::InBus => "IN_BUS",
            Self::InPassengerVehicle => "IN_PASSENGER_VEHICLE",
            Self::Other(raw) => raw,
        }
    }
}

/// A stay at one place.
#[derive(Clone, Debug)]
pub struct PlaceVisit {
    pub name: Arc<str>,
    pub location: Point,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Movement between two locations, possibly with recorded waypoints.
///
/// Waypoint timestamps are linearly interpolated across the segment
/// duration at parse time; Google's waypoint records carry none of their
/// own.
#[derive(Clone, Debug)]
pub struct ActivitySegment {
    pub activity_type: ActivityType,
    pub start_location: Point,
    pub end_location: Point,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub waypoints: Vec<Waypoint>,
}

impl ActivitySegment {
    /// The full traveled path: start location, recorded waypoints, end
    /// location, as timestamped waypoints.
    pub fn path(&self) -> Vec<Waypoint> {
        let start_time = self.start.unwrap_or(DateTime::UNIX_EPOCH);
        let end_time = self.end.unwrap_or(start_time);

        let mut path = Vec::with_capacity(self.waypoints.len() + 2);
        path.push(Waypoint::new(self.start_location, start_time));
        path.extend(self.waypoints.iter().copied());
        path.push(Waypoint::new(self.end_location, end_time));
        path
    }
}

/// One entry of a parsed timeline, in recorded order.
#[derive(Clone, Debug)]
pub enum Activity {
    PlaceVisit(PlaceVisit),
    Segment(ActivitySegment),
}

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
