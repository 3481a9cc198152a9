//! Waypoint-to-station snapping.
//!
//! Maps recorded GPS waypoints onto the nearest plausible station of a
//! [`TransitNetwork`] and resolves a display color for a journey segment.
//! Snapping is pure: identical inputs always produce identical results.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::LineIdentifier;
use crate::models::types::validate_coordinate;
use crate::models::{LineColor, Result, Snap, SnapResult, Station, Waypoint};
use crate::network::TransitNetwork;
use crate::spatial::queries::{haversine_distance, prefilter_radius_degrees};

/// Default maximum snap distance in meters.
///
/// Station spacing in the source data runs 400-800m, so half the minimum
/// spacing keeps adjacent-station ambiguity low while tolerating
/// platform-level GPS error.
pub const DEFAULT_MAX_SNAP_DISTANCE_M: f64 = 250.0;

/// Distances within this many meters of each other count as equal; the
/// station earliest in network iteration order wins the tie.
pub const DISTANCE_TIE_TOLERANCE_M: f64 = 1e-6;

/// Snapping configuration, passed in at construction time.
#[derive(Clone, Copy, Debug)]
pub struct SnapConfig {
    pub max_snap_distance_m: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
        }
    }
}

/// Assigns waypoints to stations on one read-only network.
pub struct StationSnapper {
    network: Arc<TransitNetwork>,
    config: SnapConfig,
}

impl StationSnapper {
    pub fn new(network: Arc<TransitNetwork>, config: SnapConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &Arc<TransitNetwork> {
        &self.network
    }

    pub fn config(&self) -> SnapConfig {
        self.config
    }

    /// Snap a single waypoint to the nearest station within the configured
    /// bound.
    ///
    /// `Ok(None)` means no station is close enough; that is an expected
    /// result for waypoints between stations or outside network coverage.
    /// Only malformed coordinates are an error.
    pub fn snap(&self, waypoint: &Waypoint) -> Result<Option<Snap>> {
        validate_coordinate(waypoint.location)?;

        let max_m = self.config.max_snap_distance_m;
        let radius_deg = prefilter_radius_degrees(max_m, waypoint.location.y());
        let origin = [waypoint.location.x(), waypoint.location.y()];

        let mut best: Option<(f64, usize, &Arc<Station>)> = None;

        for node in self
            .network
            .station_tree()
            .locate_within_distance(origin, radius_deg * radius_deg)
        {
            let distance = haversine_distance(waypoint.location, node.station.location);
            if distance > max_m {
                continue;
            }

            let better = match best {
                None => true,
                Some((best_distance, best_ordinal, _)) => {
                    distance < best_distance - DISTANCE_TIE_TOLERANCE_M
                        || ((distance - best_distance).abs() <= DISTANCE_TIE_TOLERANCE_M
                            && node.ordinal < best_ordinal)
                }
            };

            if better {
                best = Some((distance, node.ordinal, &node.station));
            }
        }

        Ok(best.map(|(distance_m, _, station)| Snap {
            station: station.clone(),
            distance_m,
        }))
    }

    /// Snap an ordered waypoint sequence belonging to one journey segment.
    ///
    /// Preserves input order and length; an empty sequence yields an empty
    /// result. Fails fast on the first malformed waypoint.
    pub fn snap_segment(&self, waypoints: &[Waypoint]) -> Result<Vec<SnapResult>> {
        waypoints
            .iter()
            .map(|waypoint| {
                Ok(SnapResult {
                    waypoint: *waypoint,
                    snap: self.snap(waypoint)?,
                })
            })
            .collect()
    }

    /// Resolve the dominant line color for a snapped segment.
    ///
    /// Tallies the owning line of every matched station and returns the
    /// color of the most frequent one. Ties go to the line whose match
    /// appears earliest in the sequence. All-no-match segments resolve to
    /// [`LineColor::FALLBACK`].
    pub fn resolve_line_color(&self, results: &[SnapResult]) -> LineColor {
        let mut tallies: HashMap<&LineIdentifier, (usize, usize)> = HashMap::new();

        for (index, result) in results.iter().enumerate() {
            if let Some(snap) = &result.snap {
                let entry = tallies
                    .entry(&snap.station.line_id)
                    .or_insert((0, index));
                entry.0 += 1;
            }
        }

        let mut winner: Option<(&LineIdentifier, usize, usize)> = None;
        for (line_id, (count, first_index)) in tallies {
            let better = match winner {
                None => true,
                Some((_, best_count, best_first)) => {
                    count > best_count || (count == best_count && first_index < best_first)
                }
            };
            if better {
                winner = Some((line_id, count, first_index));
            }
        }

        winner
            .and_then(|(line_id, _, _)| self.network.line(line_id))
            .map(|line| line.color)
            .unwrap_or(LineColor::FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::StationIdentifier;
    use crate::models::Line;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use geo::Point;

    fn waypoint(lon: f64, lat: f64) -> Waypoint {
        Waypoint::new(
            Point::new(lon, lat),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
    }

    fn station(id: &str, name: &str, lon: f64, lat: f64) -> Station {
        Station::new(
            StationIdentifier::new(id),
            name,
            Point::new(lon, lat),
            LineIdentifier::new("unset"),
        )
    }

    /// Station A on the Red line, Station B on the Blue line, ~915m apart.
    fn snapper(max_distance_m: f64) -> StationSnapper {
        let red = Line::new(
            LineIdentifier::new("red"),
            "Red",
            LineColor::from_hex("EE352E").unwrap(),
            vec![station("a", "Station A", -73.9855, 40.7580)],
            None,
        );
        let blue = Line::new(
            LineIdentifier::new("blue"),
            "Blue",
            LineColor::from_hex("0039A6").unwrap(),
            vec![station("b", "Station B", -73.9772, 40.7527)],
            None,
        );

        let network = Arc::new(TransitNetwork::from_lines(vec![red, blue]).unwrap());
        StationSnapper::new(
            network,
            SnapConfig {
                max_snap_distance_m: max_distance_m,
            },
        )
    }

    #[test]
    fn test_snap_coincident_waypoint_has_zero_distance() {
        let snapper = snapper(200.0);

        let snap = snapper
            .snap(&waypoint(-73.9855, 40.7580))
            .unwrap()
            .expect("coincident waypoint must match");

        assert_eq!(snap.station.name.as_ref(), "Station A");
        assert_relative_eq!(snap.distance_m, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_snap_within_bound_picks_strictly_closer_station() {
        let snapper = snapper(200.0);

        // ~170m from Station A, far beyond the bound from Station B.
        let snap = snapper
            .snap(&waypoint(-73.9840, 40.7570))
            .unwrap()
            .expect("waypoint inside bound");

        assert_eq!(snap.station.name.as_ref(), "Station A");
        assert!(snap.distance_m > 100.0 && snap.distance_m < 200.0);
    }

    #[test]
    fn test_snap_far_waypoint_yields_no_match() {
        let snapper = snapper(200.0);

        // Several km south of both stations.
        let result = snapper.snap(&waypoint(-74.000, 40.700)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_snap_is_deterministic() {
        let snapper = snapper(200.0);
        let w = waypoint(-73.9840, 40.7570);

        let first = snapper.snap(&w).unwrap().unwrap();
        let second = snapper.snap(&w).unwrap().unwrap();

        assert_eq!(first.station.id, second.station.id);
        assert_eq!(first.distance_m, second.distance_m);
    }

    #[test]
    fn test_snap_rejects_malformed_coordinates() {
        let snapper = snapper(200.0);

        assert!(snapper.snap(&waypoint(f64::NAN, 40.7)).is_err());
        assert!(snapper.snap(&waypoint(-74.0, 95.0)).is_err());
    }

    #[test]
    fn test_equidistant_tie_prefers_network_order() {
        // Two stations symmetric in longitude about the waypoint, so the
        // haversine distances are bit-identical.
        let red = Line::new(
            LineIdentifier::new("red"),
            "Red",
            LineColor::from_hex("EE352E").unwrap(),
            vec![station("west", "West", -74.001, 40.0)],
            None,
        );
        let blue = Line::new(
            LineIdentifier::new("blue"),
            "Blue",
            LineColor::from_hex("0039A6").unwrap(),
            vec![station("east", "East", -73.999, 40.0)],
            None,
        );

        let network = Arc::new(TransitNetwork::from_lines(vec![red, blue]).unwrap());
        let snapper = StationSnapper::new(network, SnapConfig::default());

        let snap = snapper
            .snap(&waypoint(-74.000, 40.0))
            .unwrap()
            .expect("both stations within bound");

        assert_eq!(snap.station.name.as_ref(), "West");
    }

    #[test]
    fn test_snap_segment_preserves_order_and_length() {
        let snapper = snapper(200.0);

        let waypoints = vec![
            waypoint(-73.9855, 40.7580), // Station A
            waypoint(-74.000, 40.700),   // no match
            waypoint(-73.9772, 40.7527), // Station B
        ];

        let results = snapper.snap_segment(&waypoints).unwrap();

        assert_eq!(results.len(), waypoints.len());
        assert_eq!(results[0].station().unwrap().name.as_ref(), "Station A");
        assert!(!results[1].is_match());
        assert_eq!(results[2].station().unwrap().name.as_ref(), "Station B");
    }

    #[test]
    fn test_snap_segment_empty_input() {
        let snapper = snapper(200.0);
        assert!(snapper.snap_segment(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_line_color_majority_wins() {
        let snapper = snapper(200.0);

        // [A, A, B]: Red has 2 matches, Blue 1.
        let results = snapper
            .snap_segment(&[
                waypoint(-73.9855, 40.7580),
                waypoint(-73.9855, 40.7580),
                waypoint(-73.9772, 40.7527),
            ])
            .unwrap();

        assert_eq!(
            snapper.resolve_line_color(&results),
            LineColor::from_hex("EE352E").unwrap()
        );
    }

    #[test]
    fn test_resolve_line_color_tie_prefers_earliest_match() {
        let snapper = snapper(200.0);

        // [A, B]: one match each; Red appears first.
        let results = snapper
            .snap_segment(&[
                waypoint(-73.9855, 40.7580),
                waypoint(-73.9772, 40.7527),
            ])
            .unwrap();

        assert_eq!(
            snapper.resolve_line_color(&results),
            LineColor::from_hex("EE352E").unwrap()
        );

        // [B, A]: same counts, Blue appears first.
        let results = snapper
            .snap_segment(&[
                waypoint(-73.9772, 40.7527),
                waypoint(-73.9855, 40.7580),
            ])
            .unwrap();

        assert_eq!(
            snapper.resolve_line_color(&results),
            LineColor::from_hex("0039A6").unwrap()
        );
    }

    #[test]
    fn test_resolve_line_color_all_no_match_falls_back() {
        let snapper = snapper(200.0);

        let results = snapper
            .snap_segment(&[waypoint(-74.000, 40.700), waypoint(-74.010, 40.690)])
            .unwrap();

        assert!(results.iter().all(|r| !r.is_match()));
        assert_eq!(snapper.resolve_line_color(&results), LineColor::FALLBACK);
    }

    #[test]
    fn test_resolve_line_color_empty_input_falls_back() {
        let snapper = snapper(200.0);
        assert_eq!(snapper.resolve_line_color(&[]), LineColor::FALLBACK);
    }
}
