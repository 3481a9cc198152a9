//! Data model for the transit network and snapping results.

pub mod color;
pub mod types;

pub use color::LineColor;
pub use types::{Line, Result, Snap, SnapResult, Station, TransitError, Waypoint};
