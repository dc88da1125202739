use anyhow::{Context, Result};
use clap::Parser;
use facility_map_lib::location::{FixedLocationSource, LocationProvider};
use facility_map_lib::map::{FacilityMapController, MarkerData, OpenOutcome, RecordingPresenter};
use facility_map_lib::models::{Coordinate, FacilityCategory};
use facility_map_lib::utils::env::load_env;
use facility_map_lib::utils::map_config::{print_env_config_example, MapConfig};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Show nearby facilities for a location", long_about = None)]
struct Args {
    /// Latitude of the reference location in degrees
    #[arg(long, allow_hyphen_values = true, default_value_t = 40.7580)]
    lat: f64,

    /// Longitude of the reference location in degrees
    #[arg(long, allow_hyphen_values = true, default_value_t = -73.9855)]
    lng: f64,

    /// Facility category, e.g. "Homeless Shelter", "Rehabilitation", "Education"
    #[arg(short, long, default_value = "Education")]
    category: String,

    /// Override FACILITY_COUNT
    #[arg(long)]
    count: Option<usize>,

    /// Override FACILITY_CLOSEST_COUNT
    #[arg(long)]
    closest: Option<usize>,

    /// Override FACILITY_SEED for a reproducible batch
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate a marker click on this facility id
    #[arg(long)]
    select: Option<u32>,

    /// Print the markers as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Print the supported environment variables and exit
    #[arg(long)]
    print_env: bool,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    reference: Coordinate,
    category: &'a FacilityCategory,
    markers: &'a [MarkerData],
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    env_logger::init();

    let args = Args::parse();
    if args.print_env {
        print_env_config_example();
        return Ok(());
    }

    let mut config = MapConfig::from_env();
    if let Some(count) = args.count {
        config.facility_count = count;
    }
    if let Some(closest) = args.closest {
        config.closest_count = closest;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let config = config.sanitized();
    config.log_config();

    let reference = Coordinate::new(args.lat, args.lng).context("Invalid --lat/--lng")?;
    let category = FacilityCategory::from(args.category.trim());

    let presenter = Arc::new(RecordingPresenter::new());
    let controller = FacilityMapController::new(
        LocationProvider::new(Arc::new(FixedLocationSource::new(reference))),
        presenter.clone(),
        config,
    );

    let start = Instant::now();
    let outcome = match controller.open(category.clone()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("[{}] {}", e.error_code(), e);
            return Err(e).context("Failed to open facility map");
        }
    };
    if let OpenOutcome::Ready { session_id, markers } = outcome {
        info!("Session {} ready with {} markers in {:.2?}", session_id, markers, start.elapsed());
    }

    let markers = presenter.markers();
    if args.json {
        let report = SessionReport {
            reference,
            category: &category,
            markers: &markers,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize markers")?
        );
    } else {
        println!("{} {} facilities near {}", category.icon(), category, reference);
        for marker in &markers {
            println!(
                "{} #{:<2} {:<24} {:>7} {:>4} min drive {:>4} min walk  {}",
                if marker.is_closest { "★" } else { " " },
                marker.facility_id,
                marker.popup.name,
                marker.popup.distance_label,
                marker.popup.driving_minutes,
                marker.popup.walking_minutes,
                marker.popup.directions_url
            );
        }
    }

    if let Some(id) = args.select {
        match controller.select_facility(id).await {
            Some(selected) => println!(
                "\nSelected {}: {} ({})",
                selected.id(),
                selected.facility.name,
                selected.facility.description
            ),
            None => warn!("No facility with id {} in this session", id),
        }
    }

    controller.close().await;
    Ok(())
}
