//! LOOM component GeoJSON loading.
//!
//! LOOM (loom.cs.uni-freiburg.de) exports one "component" per transit mode:
//! a `FeatureCollection` mixing `Point` features (stations) and `LineString`
//! features (line geometry). Stations carry a `station_label` and a `lines`
//! property listing the serving lines; line features carry `dbg_lines`
//! (comma-separated labels) and the same `lines` property with per-line
//! colors.
//!
//! The `lines` property arrives either as a JSON string or as a JSON array
//! depending on export age. That inconsistency is normalized here, once;
//! the rest of the crate only ever sees strict types.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use geo::{Coord, LineString, Point};
use geojson::{Feature, GeoJson};
use serde_json::Value as JsonValue;

use crate::identifiers::{LineIdentifier, StationIdentifier};
use crate::models::{Line, LineColor, Result, Station, TransitError};
use crate::network::TransitNetwork;

const UNKNOWN_STATION: &str = "Unknown Station";

/// One entry of a feature's `lines` property.
struct LineEntry {
    label: String,
    color: Option<LineColor>,
}

#[derive(Default)]
struct LineBuilder {
    color: Option<LineColor>,
    stations: Vec<Station>,
    geometry: Option<LineString>,
}

/// Load a network from a LOOM component file.
pub fn load_network_from_path(path: &Path) -> Result<TransitNetwork> {
    let contents = std::fs::read_to_string(path)?;
    load_network_from_str(&contents)
}

/// Load a network from LOOM component GeoJSON text.
pub fn load_network_from_str(contents: &str) -> Result<TransitNetwork> {
    let collection = match GeoJson::from_str(contents)? {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(TransitError::InvalidData(
                "expected a GeoJSON FeatureCollection".into(),
            ))
        }
    };

    // Label insertion order fixes network iteration order, so keep the
    // builder map keyed separately from the order list.
    let mut order: Vec<String> = Vec::new();
    let mut builders: HashMap<String, LineBuilder> = HashMap::new();
    let mut station_count = 0usize;

    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };

        match &geometry.value {
            geojson::Value::Point(position) => {
                let location = position_to_point(position)?;
                let entries = line_entries(feature);

                let Some(owner) = entries.first() else {
                    log::warn!(
                        "skipping station {:?} with no line attribution",
                        property_str(feature, "station_label").unwrap_or("?")
                    );
                    continue;
                };

                let name = match property_str(feature, "station_label") {
                    Some(label) if !label.is_empty() => label,
                    _ => UNKNOWN_STATION,
                };
                let id = property_str(feature, "id")
                    .map(StationIdentifier::new)
                    .unwrap_or_else(|| {
                        StationIdentifier::new(format!("station-{station_count}"))
                    });
                station_count += 1;

                let builder = builder_for(&mut builders, &mut order, &owner.label);
                if builder.color.is_none() {
                    builder.color = owner.color;
                }
                builder.stations.push(Station::new(
                    id,
                    name,
                    location,
                    LineIdentifier::new(&owner.label),
                ));
            }
            geojson::Value::LineString(positions) => {
                let geometry = positions_to_line_string(positions)?;
                let entries = line_entries(feature);

                for label in feature_line_labels(feature, &entries) {
                    let color = entries
                        .iter()
                        .find(|entry| entry.label == label)
                        .and_then(|entry| entry.color)
                        .or_else(|| entries.first().and_then(|entry| entry.color));

                    let builder = builder_for(&mut builders, &mut order, &label);
                    if builder.color.is_none() {
                        builder.color = color;
                    }
                    if builder.geometry.is_none() {
                        builder.geometry = Some(geometry.clone());
                    }
                }
            }
            _ => {}
        }
    }

    let lines = order
        .into_iter()
        .filter_map(|label| {
            let builder = builders.remove(&label)?;
            Some(Line::new(
                LineIdentifier::new(&label),
                &label,
                builder.color.unwrap_or(LineColor::FALLBACK),
                builder.stations,
                builder.geometry,
            ))
        })
        .collect();

    TransitNetwork::from_lines(lines)
}

fn builder_for<'a>(
    builders: &'a mut HashMap<String, LineBuilder>,
    order: &mut Vec<String>,
    label: &str,
) -> &'a mut LineBuilder {
    if !builders.contains_key(label) {
        order.push(label.to_string());
    }
    builders.entry(label.to_string()).or_default()
}

fn position_to_point(position: &[f64]) -> Result<Point> {
    if position.len() < 2 {
        return Err(TransitError::InvalidData(
            "GeoJSON position with fewer than two coordinates".into(),
        ));
    }
    Ok(Point::new(position[0], position[1]))
}

fn positions_to_line_string(positions: &[Vec<f64>]) -> Result<LineString> {
    let coords = positions
        .iter()
        .map(|position| {
            if position.len() < 2 {
                return Err(TransitError::InvalidData(
                    "GeoJSON position with fewer than two coordinates".into(),
                ));
            }
            Ok(Coord {
                x: position[0],
                y: position[1],
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

fn property_str<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get(key))
        .and_then(JsonValue::as_str)
}

/// Labels a line feature contributes: every `dbg_lines` token, or the
/// labels from the `lines` property when `dbg_lines` is absent.
fn feature_line_labels(feature: &Feature, entries: &[LineEntry]) -> Vec<String> {
    if let Some(dbg_lines) = property_str(feature, "dbg_lines") {
        let labels: Vec<String> = dbg_lines
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        if !labels.is_empty() {
            return labels;
        }
    }

    entries.iter().map(|entry| entry.label.clone()).collect()
}

/// Parse a feature's `lines` property, tolerating both the JSON-string and
/// JSON-array encodings. Malformed entries are dropped rather than failing
/// the whole load; unparseable colors fall back to no color.
fn line_entries(feature: &Feature) -> Vec<LineEntry> {
    let raw = feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("lines"));

    let parsed: Option<Vec<JsonValue>> = match raw {
        Some(JsonValue::String(text)) => serde_json::from_str(text).ok(),
        Some(JsonValue::Array(values)) => Some(values.clone()),
        _ => None,
    };

    parsed
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| {
            let label = value.get("label")?.as_str()?.to_string();
            let color = value
                .get("color")
                .and_then(JsonValue::as_str)
                .and_then(|hex| match LineColor::from_hex(hex) {
                    Ok(color) => Some(color),
                    Err(_) => {
                        log::warn!("ignoring unparseable line color {hex:?} for {label}");
                        None
                    }
                });
            Some(LineEntry { label, color })
        })
        .collect()
}
