//! Google My Maps CSV layers.
//!
//! My Maps imports point layers from `name,latitude,longitude,Description`
//! CSVs and line layers from WKT CSVs. Station rows get generic names (the
//! label goes into the description); line features carrying several labels
//! are split into one row per label, sharing the geometry.

use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, Value};

use crate::extract::{line_names, property_str, UNKNOWN_LINE};

pub struct StationRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

pub struct LineRow {
    pub wkt: String,
    pub name: String,
    pub description: String,
}

/// Description used when a station has no label; phrased per layer kind so
/// the map popup still says what the marker is.
fn unknown_station_description(kind: &str) -> &'static str {
    if kind.contains("SUBWAY") {
        "Unknown Subway Station"
    } else if kind.contains("RAIL") {
        "Unknown Rail Station"
    } else if kind.contains("TRAM") {
        "Unknown Tram Station"
    } else {
        "Unknown Station"
    }
}

pub fn station_rows(points: &[&Feature], kind: &str) -> Vec<StationRow> {
    points
        .iter()
        .filter_map(|feature| {
            let Some(Value::Point(position)) = feature.geometry.as_ref().map(|g| &g.value)
            else {
                return None;
            };
            if position.len() < 2 {
                return None;
            }

            let description = match property_str(feature, "station_label") {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => unknown_station_description(kind).to_string(),
            };

            Some(StationRow {
                name: format!("{kind} Station"),
                latitude: position[1],
                longitude: position[0],
                description,
            })
        })
        .collect()
}

pub fn line_rows(lines: &[&Feature]) -> Vec<LineRow> {
    let mut rows = Vec::new();

    for feature in lines {
        let Some(Value::LineString(positions)) = feature.geometry.as_ref().map(|g| &g.value)
        else {
            continue;
        };
        let wkt = linestring_wkt(positions);

        let mut names = line_names(feature);
        if names.is_empty() {
            names.push(UNKNOWN_LINE.to_string());
        }

        for name in names {
            rows.push(LineRow {
                wkt: wkt.clone(),
                description: name.clone(),
                name,
            });
        }
    }

    rows
}

pub fn linestring_wkt(positions: &[Vec<f64>]) -> String {
    let coords: Vec<String> = positions
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| format!("{} {}", position[0], position[1]))
        .collect();

    format!("LINESTRING ({})", coords.join(", "))
}

pub fn write_stations_csv(rows: &[StationRow], path: &Path) -> Result<()> {
    log::info!("Writing {} station rows to {}", rows.len(), path.display());

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(["name", "latitude", "longitude", "Description"])?;
    for row in rows {
        writer.write_record([
            row.name.as_str(),
            &row.latitude.to_string(),
            &row.longitude.to_string(),
            row.description.as_str(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_lines_csv(rows: &[LineRow], path: &Path) -> Result<()> {
    log::info!("Writing {} line rows to {}", rows.len(), path.display());

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(["WKT", "name", "Description"])?;
    for row in rows {
        writer.write_record([row.wkt.as_str(), row.name.as_str(), row.description.as_str()])?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point_feature(lon: f64, lat: f64, label: &str) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [lon, lat] },
            "properties": { "station_label": label },
        }))
        .unwrap()
    }

    fn line_feature(dbg_lines: &str) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[11.5, 48.1], [11.6, 48.2]]
            },
            "properties": { "dbg_lines": dbg_lines },
        }))
        .unwrap()
    }

    #[test]
    fn test_station_rows_use_generic_names_and_label_descriptions() {
        let a = point_feature(11.5, 48.1, "Marienplatz");
        let b = point_feature(11.6, 48.2, "Hauptbahnhof");
        let rows = station_rows(&[&a, &b], "SUBWAY_LIGHTRAIL");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "SUBWAY_LIGHTRAIL Station");
        assert_eq!(rows[0].latitude, 48.1);
        assert_eq!(rows[0].longitude, 11.5);
        assert_eq!(rows[0].description, "Marienplatz");
        assert_eq!(rows[1].description, "Hauptbahnhof");
    }

    #[test]
    fn test_station_rows_kind_specific_fallback_description() {
        let unnamed = point_feature(11.5, 48.1, "");

        let rows = station_rows(&[&unnamed], "SUBWAY_LIGHTRAIL");
        assert_eq!(rows[0].description, "Unknown Subway Station");

        let rows = station_rows(&[&unnamed], "COMMUTER_RAIL");
        assert_eq!(rows[0].description, "Unknown Rail Station");

        let rows = station_rows(&[&unnamed], "TRAM");
        assert_eq!(rows[0].description, "Unknown Tram Station");
    }

    #[test]
    fn test_line_rows_single_label() {
        let feature = line_feature("U5");
        let rows = line_rows(&[&feature]);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].wkt.starts_with("LINESTRING"));
        assert_eq!(rows[0].name, "U5");
        assert_eq!(rows[0].description, "U5");
    }

    #[test]
    fn test_line_rows_split_multi_label_entries() {
        let feature = line_feature("S4,S20,S3");
        let rows = line_rows(&[&feature]);

        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["S4", "S20", "S3"]);

        // All rows share the source geometry.
        assert!(rows.iter().all(|row| row.wkt == rows[0].wkt));
    }

    #[test]
    fn test_line_rows_unknown_line_fallback() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[11.5, 48.1], [11.6, 48.2]]
            },
            "properties": {},
        }))
        .unwrap();

        let rows = line_rows(&[&feature]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, UNKNOWN_LINE);
    }

    #[test]
    fn test_line_rows_mixed_single_and_multi() {
        let single = line_feature("U5");
        let multi = line_feature("S1,S6,S8");
        let rows = line_rows(&[&single, &multi]);

        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["U5", "S1", "S6", "S8"]);
    }

    #[test]
    fn test_linestring_wkt_format() {
        let wkt = linestring_wkt(&[vec![11.5, 48.1], vec![11.6, 48.2]]);
        assert_eq!(wkt, "LINESTRING (11.5 48.1, 11.6 48.2)");
    }
}
