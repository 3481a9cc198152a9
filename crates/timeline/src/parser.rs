//! Raw timeline JSON records and their normalization.
//!
//! The raw layer mirrors Google's export verbatim: E7 integer coordinates
//! and the field-name drift between exports (`longitudeE7` vs `lngE7`,
//! `latitudeE7` vs `latE7`) handled with serde aliases. Everything leaving
//! this module is in plain degrees with strict types.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use geo::Point;
use journey_transit::Waypoint;
use serde::Deserialize;

use crate::models::{Activity, ActivitySegment, ActivityType, PlaceVisit, Result};

// ============================================================================
// Raw records
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawTimeline {
    #[serde(rename = "timelineObjects", default)]
    timeline_objects: Vec<RawTimelineObject>,
}

#[derive(Debug, Deserialize)]
struct RawTimelineObject {
    #[serde(rename = "placeVisit")]
    place_visit: Option<RawPlaceVisit>,
    #[serde(rename = "activitySegment")]
    activity_segment: Option<RawActivitySegment>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLocation {
    #[serde(rename = "latitudeE7", alias = "latE7", default)]
    latitude_e7: i64,
    #[serde(rename = "longitudeE7", alias = "lngE7", default)]
    longitude_e7: i64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDuration {
    #[serde(rename = "startTimestamp", default)]
    start: Option<String>,
    #[serde(rename = "endTimestamp", default)]
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlaceVisit {
    #[serde(default)]
    location: RawLocation,
    #[serde(default)]
    duration: RawDuration,
}

#[derive(Debug, Deserialize)]
struct RawActivitySegment {
    #[serde(rename = "activityType", default)]
    activity_type: Option<String>,
    #[serde(rename = "startLocation", default)]
    start_location: RawLocation,
    #[serde(rename = "endLocation", default)]
    end_location: RawLocation,
    #[serde(default)]
    duration: RawDuration,
    #[serde(default)]
    waypoints: Vec<RawWaypoint>,
}

#[derive(Debug, Deserialize)]
struct RawWaypoint {
    #[serde(rename = "latE7", default)]
    latitude_e7: i64,
    #[serde(rename = "lngE7", default)]
    longitude_e7: i64,
}

// ============================================================================
// Normalization
// ============================================================================

fn e7_to_degrees(value: i64) -> f64 {
    value as f64 / 1e7
}

fn location_point(location: &RawLocation) -> Point {
    Point::new(
        e7_to_degrees(location.longitude_e7),
        e7_to_degrees(location.latitude_e7),
    )
}

/// The export contains empty timestamp strings; treat anything that is not
/// valid RFC 3339 as absent rather than failing the parse.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|time| time.with_timezone(&Utc))
}

/// Assign interior waypoints evenly spaced timestamps across the segment
/// duration. Waypoint `i` of `n` gets `start + (i+1)/(n+1)` of the span.
fn interpolate_waypoints(
    raw_waypoints: &[RawWaypoint],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<Waypoint> {
    let start_time = start.unwrap_or(DateTime::UNIX_EPOCH);
    let span = match end {
        Some(end_time) if end_time > start_time => end_time - start_time,
        _ => Duration::zero(),
    };
    let steps = (raw_waypoints.len() + 1) as i32;

    raw_waypoints
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let offset = span * (index as i32 + 1) / steps;
            Waypoint::new(
                Point::new(
                    e7_to_degrees(raw.longitude_e7),
                    e7_to_degrees(raw.latitude_e7),
                ),
                start_time + offset,
            )
        })
        .collect()
}

fn normalize_place_visit(raw: RawPlaceVisit) -> PlaceVisit {
    let name = raw
        .location
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown Place");

    PlaceVisit {
        name: name.into(),
        location: location_point(&raw.location),
        start: parse_timestamp(raw.duration.start.as_deref()),
        end: parse_timestamp(raw.duration.end.as_deref()),
    }
}

fn normalize_segment(raw: RawActivitySegment) -> ActivitySegment {
    let start = parse_timestamp(raw.duration.start.as_deref());
    let end = parse_timestamp(raw.duration.end.as_deref());
    let waypoints = interpolate_waypoints(&raw.waypoints, start, end);

    ActivitySegment {
        activity_type: raw
            .activity_type
            .as_deref()
            .map(ActivityType::from_raw)
            .unwrap_or(ActivityType::Other("UNKNOWN".into())),
        start_location: location_point(&raw.start_location),
        end_location: location_point(&raw.end_location),
        start,
        end,
        waypoints,
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a timeline export into activities, in recorded order.
pub fn parse_timeline_str(contents: &str) -> Result<Vec<Activity>> {
    let raw: RawTimeline = serde_json::from_str(contents)?;

    Ok(raw
        .timeline_objects
        .into_iter()
        .filter_map(|object| {
            if let Some(place_visit) = object.place_visit {
                Some(Activity::PlaceVisit(normalize_place_visit(place_visit)))
            } else {
                object
                    .activity_segment
                    .map(|segment| Activity::Segment(normalize_segment(segment)))
            }
        })
        .collect())
}

/// Parse a timeline export file.
pub fn parse_timeline_path(path: &Path) -> Result<Vec<Activity>> {
    let contents = std::fs::read_to_string(path)?;
    parse_timeline_str(&contents)
}
