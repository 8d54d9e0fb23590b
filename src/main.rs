//! # ELD Trip Planner Entry Point
//!
//! Command-line front end: reads a trip request from flags, plans it, and prints
//! either a text log table or the full JSON response.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use trip_planner_lib::config::Config;
use trip_planner_lib::routing::{GraphHopperClient, RoutingProvider};
use trip_planner_lib::trip::{plan_trip, TripRequest};
use trip_planner_lib::{hos::Completion, renderer::draw_ascii};

#[derive(Debug, Parser)]
#[command(name = "eld-trip-planner", version)]
#[command(about = "Plan a truck trip with fuel stops and Hours-of-Service daily logs")]
struct Args {
    /// Where the driver is now
    #[arg(long)]
    current: String,

    /// Pickup address
    #[arg(long)]
    pickup: String,

    /// Drop-off address
    #[arg(long)]
    dropoff: String,

    /// On-duty hours already used in the 70-hour/8-day cycle
    #[arg(long, default_value_t = 0.0)]
    cycle_used: f64,

    /// First log day (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Configuration file (defaults to ./trip-planner.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the routing provider and use offline estimates
    #[arg(long)]
    offline: bool,

    /// Print the response as JSON instead of a text table
    #[arg(long)]
    json: bool,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path).with_env_overrides(),
        None => Config::load(),
    };

    let request = TripRequest {
        current_address: args.current,
        pickup_address: args.pickup,
        dropoff_address: args.dropoff,
        cycle_used_hours: args.cycle_used,
    };
    request.validate().context("invalid trip request")?;

    let client = if args.offline {
        info!("Offline mode: using estimated locations and route");
        None
    } else if config.routing.api_key.trim().is_empty() {
        warn!("No routing API key configured; using offline estimates");
        None
    } else {
        Some(GraphHopperClient::new(config.routing.clone()).context("building HTTP client")?)
    };
    let provider = client.as_ref().map(|c| c as &dyn RoutingProvider);

    let now = args
        .start_date
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|start| start.and_utc());

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;
    let trip = rt.block_on(plan_trip(&request, provider, &config.planner, now));

    if let Completion::Incomplete { .. } = trip.completion {
        warn!(
            "Trip did not complete within {} simulated days",
            trip.daily_logs.len()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&trip)?);
    } else {
        draw_ascii(&trip);
    }

    Ok(())
}
