use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod export;

use export::{collapse_consecutive, feature_collection, segment_feature, station_features};
use journey_timeline::{parse_timeline_path, Activity, ActivityType};
use journey_transit::{SnapConfig, StationSnapper};

#[derive(Parser, Debug)]
#[command(
    name = "journey-snap",
    author,
    version,
    about = "Snap Google timeline subway journeys onto a transit network",
    long_about = "Reads a Google Maps timeline export and a LOOM transit network \
                  GeoJSON, snaps every subway segment's recorded waypoints onto the \
                  nearest stations, and writes a GeoJSON journey: one colored line \
                  per segment plus numbered station visits."
)]
struct Args {
    /// LOOM network component GeoJSON
    #[arg(short, long)]
    network: PathBuf,

    /// Google timeline JSON export
    #[arg(short, long)]
    timeline: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum waypoint-to-station snap distance in meters
    #[arg(long, default_value_t = journey_transit::snap::DEFAULT_MAX_SNAP_DISTANCE_M)]
    max_distance_m: f64,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Journey Snapper ===");
    log::info!("Network: {}", args.network.display());
    log::info!("Timeline: {}", args.timeline.display());

    // Phase 1: Load the network
    log::info!("");
    log::info!("Phase 1: Loading transit network...");
    let network = Arc::new(
        journey_transit::loom::load_network_from_path(&args.network)
            .context("Failed to load transit network")?,
    );
    log::info!(
        "  {} lines, {} stations",
        network.lines().len(),
        network.station_count()
    );

    let snapper = StationSnapper::new(
        network.clone(),
        SnapConfig {
            max_snap_distance_m: args.max_distance_m,
        },
    );

    // Phase 2: Parse the timeline
    log::info!("");
    log::info!("Phase 2: Parsing timeline...");
    let activities =
        parse_timeline_path(&args.timeline).context("Failed to parse timeline export")?;
    log::info!("  {} timeline entries", activities.len());

    let subway_segments: Vec<_> = activities
        .iter()
        .filter_map(|activity| match activity {
            Activity::Segment(segment) if segment.activity_type == ActivityType::InSubway => {
                Some(segment)
            }
            _ => None,
        })
        .collect();

    if subway_segments.is_empty() {
        log::warn!("  No subway segments in this timeline; writing an empty journey");
    } else {
        log::info!("  {} subway segments", subway_segments.len());
    }

    // Phase 3: Snap segments to stations
    log::info!("");
    log::info!("Phase 3: Snapping waypoints to stations...");

    let mut features = Vec::new();
    let mut journey_order = 1usize;

    for (index, segment) in subway_segments.iter().enumerate() {
        let path = segment.path();
        let results = snapper
            .snap_segment(&path)
            .with_context(|| format!("Failed to snap segment {}", index + 1))?;

        let matched = results.iter().filter(|result| result.is_match()).count();
        let visits = collapse_consecutive(&results);
        log::info!(
            "  Segment {}: {} waypoints, {} matched, {} station visits",
            index + 1,
            path.len(),
            matched,
            visits.len()
        );

        if visits.is_empty() {
            log::warn!("    No stations matched; segment skipped");
            continue;
        }

        let color = snapper.resolve_line_color(&results);
        if let Some(feature) = segment_feature(&visits, index + 1, &color.to_hex()) {
            features.push(feature);
        }
        journey_order = station_features(&visits, &network, journey_order, &mut features);
    }

    // Phase 4: Write output
    log::info!("");
    log::info!("Phase 4: Writing journey GeoJSON...");
    let collection = feature_collection(features);
    let contents = serde_json::to_string_pretty(&geojson::GeoJson::from(collection))?;
    std::fs::write(&args.output, contents)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("");
    log::info!("Output written to: {}", args.output.display());
    log::info!("Done!");

    Ok(())
}
