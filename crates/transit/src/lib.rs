//! # journey-transit
//!
//! Static transit network model with waypoint-to-station snapping.
//!
//! ## Features
//!
//! - **Immutable network**: lines and stations built once, shared via `Arc`
//! - **Spatial queries**: fast R-tree based station lookup
//! - **Snapping**: distance-bounded nearest-station assignment for recorded
//!   GPS waypoints, with deterministic tie-breaking
//! - **Line colors**: majority-vote color resolution for a journey segment
//! - **LOOM loading** (optional): build a network from a LOOM component
//!   GeoJSON export
//!
//! ## Example
//!
//! ```
//! use journey_transit::prelude::*;
//! use chrono::{TimeZone, Utc};
//! use geo::Point;
//! use std::sync::Arc;
//!
//! let red = Line::new(
//!     LineIdentifier::new("red"),
//!     "Red",
//!     LineColor::from_hex("EE352E").unwrap(),
//!     vec![Station::new(
//!         StationIdentifier::new("times_sq"),
//!         "Times Square",
//!         Point::new(-73.9855, 40.7580),
//!         LineIdentifier::new("red"),
//!     )],
//!     None,
//! );
//!
//! let network = Arc::new(TransitNetwork::from_lines(vec![red]).unwrap());
//! let snapper = StationSnapper::new(network, SnapConfig::default());
//!
//! let waypoint = Waypoint::new(
//!     Point::new(-73.9855, 40.7580),
//!     Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
//! );
//! let snap = snapper.snap(&waypoint).unwrap().expect("station within range");
//! assert_eq!(snap.station.name.as_ref(), "Times Square");
//! assert!(snap.distance_m < 1.0);
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod snap;
pub mod spatial;

#[cfg(feature = "loom")]
pub mod loom;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{LineColor, Line, Snap, SnapResult, Station, TransitError, Waypoint};
    pub use crate::network::TransitNetwork;
    pub use crate::snap::{SnapConfig, StationSnapper};
}

pub use prelude::*;
