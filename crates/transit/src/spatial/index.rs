//! R-tree nodes for spatial indexing.
//!
//! Wraps stations with geometric data for efficient spatial queries.
//!
//! ## Two-Stage Filtering
//!
//! Spatial lookups use a two-stage filtering approach:
//! 1. **R-tree filter**: Euclidean distance in degree space for fast
//!    approximate filtering
//! 2. **Haversine filter**: accurate geodesic distance on the filtered
//!    candidates
//!
//! This balances performance (fast Euclidean checks in the R-tree) with
//! accuracy (precise Haversine distance for final results), which matters
//! for geographic coordinates where Euclidean distance becomes increasingly
//! inaccurate over larger distances.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::Station;

#[derive(Clone)]
pub struct StationNode {
    pub station: Arc<Station>,
    /// Position in network iteration order; breaks distance ties
    /// deterministically.
    pub ordinal: usize,
    point: [f64; 2],
}

impl StationNode {
    pub fn new(location: Point, ordinal: usize, station: Arc<Station>) -> Self {
        Self {
            station,
            ordinal,
            point: [location.x(), location.y()],
        }
    }
}

impl RTreeObject for StationNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
