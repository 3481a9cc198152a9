//! Pulling stations, lines, and line names out of LOOM features.

use geojson::{Feature, FeatureCollection, Value};
use serde_json::Value as JsonValue;

pub const UNKNOWN_LINE: &str = "Unknown Line";

/// Split a component's features into stations (points) and line geometry
/// (linestrings). Other geometry types are ignored.
pub fn separate_geometries(collection: &FeatureCollection) -> (Vec<&Feature>, Vec<&Feature>) {
    let mut points = Vec::new();
    let mut lines = Vec::new();

    for feature in &collection.features {
        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(_)) => points.push(feature),
            Some(Value::LineString(_)) => lines.push(feature),
            _ => {}
        }
    }

    (points, lines)
}

pub fn property_str<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get(key))
        .and_then(JsonValue::as_str)
}

/// All individual line labels a feature carries: every comma-separated
/// `dbg_lines` token, falling back to the labels in the `lines` property
/// (which arrives as either a JSON string or a JSON array).
pub fn line_names(feature: &Feature) -> Vec<String> {
    if let Some(dbg_lines) = property_str(feature, "dbg_lines") {
        let names: Vec<String> = dbg_lines
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            return names;
        }
    }

    lines_property_labels(feature)
}

fn lines_property_labels(feature: &Feature) -> Vec<String> {
    let raw = feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("lines"));

    let entries: Option<Vec<JsonValue>> = match raw {
        Some(JsonValue::String(text)) => serde_json::from_str(text).ok(),
        Some(JsonValue::Array(values)) => Some(values.clone()),
        _ => None,
    };

    entries
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| entry.get("label")?.as_str().map(str::to_string))
        .collect()
}
