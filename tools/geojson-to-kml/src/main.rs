use anyhow::{bail, Context, Result};
use clap::Parser;
use geojson::GeoJson;
use std::path::PathBuf;

mod extract;
mod kml;
mod layers;

use extract::separate_geometries;
use kml::write_simple_kml;
use layers::{line_rows, station_rows, write_lines_csv, write_stations_csv};

#[derive(Parser, Debug)]
#[command(
    name = "geojson-to-kml",
    author,
    version,
    about = "Convert LOOM transit GeoJSON into Google My Maps layer files",
    long_about = "Reads LOOM transit map GeoJSON components and writes, for each input, \
                  a station CSV, a line CSV, and a simplified KML file that Google \
                  My Maps imports as separate layers.\n\n\
                  The input file stem becomes the layer kind: 'subway-lightrail.json' \
                  produces SUBWAY_LIGHTRAIL station rows and a subway-lightrail.kml layer."
)]
struct Args {
    /// Input LOOM GeoJSON files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the generated layer files (defaults to each input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn layer_kind(input: &PathBuf) -> Result<String> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Input has no usable file stem: {}", input.display()))?;
    Ok(stem.to_uppercase().replace('-', "_"))
}

fn convert(input: &PathBuf, output_dir: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let geojson: GeoJson = raw
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON from {}", input.display()))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        bail!("{} is not a FeatureCollection", input.display());
    };

    let (points, lines) = separate_geometries(&collection);
    log::info!(
        "  {} station features, {} line features",
        points.len(),
        lines.len()
    );

    let kind = layer_kind(input)?;
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("layer");

    let stations = station_rows(&points, &kind);
    write_stations_csv(&stations, &output_dir.join(format!("{stem}_stations.csv")))?;

    let rows = line_rows(&lines);
    write_lines_csv(&rows, &output_dir.join(format!("{stem}_lines.csv")))?;

    let mut placemarks = points;
    placemarks.extend(lines);
    write_simple_kml(&placemarks, stem, &output_dir.join(format!("{stem}.kml")))?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== LOOM GeoJSON to My Maps Layers ===");

    for input in &args.inputs {
        if !input.exists() {
            bail!("Input file does not exist: {}", input.display());
        }
    }

    for (index, input) in args.inputs.iter().enumerate() {
        log::info!("");
        log::info!(
            "Converting {} ({}/{})...",
            input.display(),
            index + 1,
            args.inputs.len()
        );

        let output_dir = match &args.output_dir {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        convert(input, &output_dir)
            .with_context(|| format!("Failed to convert {}", input.display()))?;
    }

    log::info!("");
    log::info!("Done!");

    Ok(())
}
