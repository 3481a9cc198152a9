//! Simplified KML output for Google My Maps.
//!
//! My Maps is picky about KML structure. The shape that imports cleanly:
//! a `root_doc` document, one schema named after the layer carrying the
//! full LOOM field set, placemarks with `<layer>.<n>` ids and *no* `<name>`
//! element (names in placemarks turn into giant map labels), attributes in
//! `ExtendedData`/`SchemaData`, coordinates as `lng,lat`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, Value};
use serde_json::Value as JsonValue;

/// LOOM fields exported on every layer, in schema order. `component` is the
/// only integer field.
const SCHEMA_FIELDS: [(&str, &str); 7] = [
    ("component", "int"),
    ("deg", "string"),
    ("deg_in", "string"),
    ("deg_out", "string"),
    ("id", "string"),
    ("station_label", "string"),
    ("dbg_lines", "string"),
];

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn json_value_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn coordinates_text(positions: &[Vec<f64>]) -> String {
    positions
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| format!("{},{}", position[0], position[1]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_placemark(kml: &mut String, feature: &Feature, layer: &str, index: usize) {
    let Some(geometry) = &feature.geometry else {
        return;
    };

    let geometry_xml = match &geometry.value {
        Value::Point(position) => format!(
            "<Point><coordinates>{}</coordinates></Point>",
            coordinates_text(std::slice::from_ref(position))
        ),
        Value::LineString(positions) => format!(
            "<LineString><coordinates>{}</coordinates></LineString>",
            coordinates_text(positions)
        ),
        _ => return,
    };

    let _ = writeln!(kml, "<Placemark id=\"{layer}.{index}\">");
    let _ = writeln!(kml, "<ExtendedData><SchemaData schemaUrl=\"#{layer}\">");

    for (field, _) in SCHEMA_FIELDS {
        let value = feature
            .properties
            .as_ref()
            .and_then(|properties| properties.get(field))
            .and_then(json_value_text);
        if let Some(value) = value {
            let _ = writeln!(
                kml,
                "<SimpleData name=\"{field}\">{}</SimpleData>",
                escape_xml(&value)
            );
        }
    }

    let _ = writeln!(kml, "</SchemaData></ExtendedData>");
    let _ = writeln!(kml, "{geometry_xml}");
    let _ = writeln!(kml, "</Placemark>");
}

/// Render the layer as a KML document string.
pub fn simple_kml_string(features: &[&Feature], layer: &str) -> String {
    let mut kml = String::new();

    kml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n");
    kml.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    kml.push_str("<Document id=\"root_doc\">\n");

    let _ = writeln!(kml, "<Schema name=\"{layer}\" id=\"{layer}\">");
    for (field, field_type) in SCHEMA_FIELDS {
        let _ = writeln!(
            kml,
            "<SimpleField name=\"{field}\" type=\"{field_type}\"></SimpleField>"
        );
    }
    kml.push_str("</Schema>\n");

    let _ = writeln!(kml, "<Folder><name>{}</name>", escape_xml(layer));
    for (index, feature) in features.iter().enumerate() {
        push_placemark(&mut kml, feature, layer, index + 1);
    }
    kml.push_str("</Folder>\n");

    kml.push_str("</Document></kml>\n");
    kml
}

/// Write the layer KML to a file.
pub fn write_simple_kml(features: &[&Feature], layer: &str, path: &Path) -> Result<()> {
    log::info!(
        "Writing KML layer {:?} ({} placemarks) to {}",
        layer,
        features.len(),
        path.display()
    );

    std::fs::write(path, simple_kml_string(features, layer))
        .with_context(|| format!("Failed to write KML to {}", path.display()))?;

    Ok(())
}
