//! In-memory transit network with spatial indexing.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::identifiers::LineIdentifier;
use crate::models::types::validate_coordinate;
use crate::models::{Line, Result, Station};
use crate::spatial::index::StationNode;
use crate::spatial::queries::haversine_distance;

/// The full set of lines for one city, loaded once per run and read-only
/// afterwards.
///
/// Stations are held in *network iteration order*: line insertion order,
/// then route order within each line. That order is the tie-break for
/// snapping, so it must stay stable.
///
/// Cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct TransitNetwork {
    lines: Vec<Arc<Line>>,
    line_map: HashMap<LineIdentifier, Arc<Line>>,
    stations: Vec<Arc<Station>>,
    station_tree: RTree<StationNode>,
}

impl TransitNetwork {
    /// Build a network from fully constructed lines.
    ///
    /// Validates every station coordinate; the snapper can then assume the
    /// network side of each distance computation is well-formed.
    pub fn from_lines(lines: Vec<Line>) -> Result<Self> {
        let lines: Vec<Arc<Line>> = lines.into_iter().map(Arc::new).collect();

        let mut stations = Vec::new();
        for line in &lines {
            for station in &line.stations {
                validate_coordinate(station.location)?;
                stations.push(station.clone());
            }
        }

        let line_map: HashMap<_, _> = lines
            .iter()
            .map(|line| (line.id.clone(), line.clone()))
            .collect();

        let station_tree = RTree::bulk_load(
            stations
                .iter()
                .enumerate()
                .map(|(ordinal, station)| {
                    StationNode::new(station.location, ordinal, station.clone())
                })
                .collect(),
        );

        Ok(Self {
            lines,
            line_map,
            stations,
            station_tree,
        })
    }

    pub fn lines(&self) -> &[Arc<Line>] {
        &self.lines
    }

    pub fn line(&self, id: &LineIdentifier) -> Option<&Arc<Line>> {
        self.line_map.get(id)
    }

    /// All stations in network iteration order.
    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Find stations within `radius_m` of a point, nearest first.
    pub fn stations_near(&self, point: Point, radius_m: f64) -> Vec<Arc<Station>> {
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let radius_deg =
            crate::spatial::queries::prefilter_radius_degrees(radius_m, point.y());

        let mut hits: Vec<(f64, Arc<Station>)> = self
            .station_tree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
            .filter_map(|node| {
                let distance = haversine_distance(point, node.station.location);
                (distance <= radius_m).then(|| (distance, node.station.clone()))
            })
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, station)| station).collect()
    }

    pub(crate) fn station_tree(&self) -> &RTree<StationNode> {
        &self.station_tree
    }
}
