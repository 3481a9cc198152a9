//! # journey-timeline
//!
//! Parser for Google Maps timeline JSON exports.
//!
//! Turns the loosely structured `timelineObjects` records (E7 integer
//! coordinates, inconsistent field naming between `longitudeE7` and
//! `lngE7`) into strict, normalized [`Activity`] values carrying
//! [`journey_transit::Waypoint`]s, ready for snapping. All vendor quirks
//! are reconciled here; nothing downstream special-cases field names.

pub mod models;
pub mod parser;

pub use models::{Activity, ActivitySegment, ActivityType, PlaceVisit, Result, TimelineError};
pub use parser::{parse_timeline_path, parse_timeline_str};
