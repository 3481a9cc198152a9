//! GeoJSON export of snapped journeys.
//!
//! Each subway segment becomes one `LineString` feature colored by its
//! resolved line, plus one `Point` feature per visited station. Station
//! points carry a global 1-based `journey_order` so the map shows the
//! travel sequence across segments.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map};

use journey_transit::{Snap, SnapResult, TransitNetwork};

/// Matched stations of a segment in travel order, with consecutive
/// repeats collapsed.
///
/// A train dwelling at a platform produces several waypoints snapping to
/// the same station; those collapse into one visit keeping the closest
/// approach distance. The same station appearing again later (a loop, or
/// a return trip inside one segment) stays a separate visit.
pub fn collapse_consecutive(results: &[SnapResult]) -> Vec<Snap> {
    let mut visits: Vec<Snap> = Vec::new();

    for result in results {
        let Some(snap) = &result.snap else {
            continue;
        };

        match visits.last_mut() {
            Some(last) if last.station.id == snap.station.id => {
                if snap.distance_m < last.distance_m {
                    last.distance_m = snap.distance_m;
                }
            }
            _ => visits.push(snap.clone()),
        }
    }

    visits
}

/// Point features for a segment's visited stations.
///
/// `journey_order` numbers the stations across the whole journey, so the
/// caller passes the order of the first visit and gets back the next
/// unused order value.
pub fn station_features(
    visits: &[Snap],
    network: &TransitNetwork,
    first_order: usize,
    features: &mut Vec<Feature>,
) -> usize {
    let mut order = first_order;

    for visit in visits {
        let line_name = network
            .line(&visit.station.line_id)
            .map(|line| line.name.to_string())
            .unwrap_or_else(|| visit.station.line_id.to_string());

        let mut properties = Map::new();
        properties.insert("name".into(), json!(visit.station.name.as_ref()));
        properties.insert("line".into(), json!(line_name));
        properties.insert("journey_order".into(), json!(order));
        properties.insert("distance_m".into(), json!(visit.distance_m));

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![
                visit.station.location.x(),
                visit.station.location.y(),
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });

        order += 1;
    }

    order
}

/// LineString feature tracing a segment through its visited stations.
///
/// `None` when the segment visited fewer than two distinct stations;
/// a single station does not make a line.
pub fn segment_feature(visits: &[Snap], segment: usize, stroke: &str) -> Option<Feature> {
    if visits.len() < 2 {
        return None;
    }

    let positions: Vec<Vec<f64>> = visits
        .iter()
        .map(|visit| vec![visit.station.location.x(), visit.station.location.y()])
        .collect();

    let mut properties = Map::new();
    properties.insert("segment".into(), json!(segment));
    properties.insert("stroke".into(), json!(stroke));

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(positions))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

pub fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
