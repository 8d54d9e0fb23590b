//! # Trip Planning
//!
//! Orchestrates a full plan: resolve the three addresses, route through them,
//! then run the fuel planner and the HOS generator side by side and merge their
//! output into a [`TripResponse`].
//!
//! Provider failures never fail the plan. Each one is logged and replaced by the
//! matching estimate from [`crate::fallback`], and the response is flagged as
//! `estimated`.

use crate::config::PlannerConfig;
use crate::hos::{self, Completion};
use crate::routing::{RouteSummary, RoutingProvider};
use crate::{fallback, fuel, round1, Coordinate, DailyLog, FuelStop, Location, RouteGeometry};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pickup and drop-off handling added once per trip to the driving time.
pub const TRIP_OVERHEAD_HOURS: f64 = 2.0;

#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("{0} address is required")]
    BlankAddress(&'static str),

    #[error("cycle hours used must be between 0 and 70, got {0}")]
    CycleHoursOutOfRange(f64),
}

/// What the driver asks for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub current_address: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    /// On-duty hours already used in the current 70-hour/8-day cycle
    pub cycle_used_hours: f64,
}

impl TripRequest {
    /// Form-level checks. [`plan_trip`] does not require these to pass; it clamps.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (field, value) in [
            ("current", &self.current_address),
            ("pickup", &self.pickup_address),
            ("dropoff", &self.dropoff_address),
        ] {
            if value.trim().is_empty() {
                return Err(RequestError::BlankAddress(field));
            }
        }
        if !(0.0..=hos::MAX_CYCLE).contains(&self.cycle_used_hours) {
            return Err(RequestError::CycleHoursOutOfRange(self.cycle_used_hours));
        }
        Ok(())
    }
}

/// The complete plan handed to presentation and export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripResponse {
    pub id: String,
    pub route_geometry: RouteGeometry,
    pub total_miles: u32,
    /// Driving time plus the fixed trip overhead, one decimal
    pub total_hours: f64,
    pub total_days: usize,
    pub cycle_hours_remaining: f64,
    pub fuel_stops: Vec<FuelStop>,
    pub daily_logs: Vec<DailyLog>,
    pub current_location: Location,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    /// Whether the daily logs cover the whole trip
    pub completion: Completion,
    /// True when any location or the route came from an offline estimate
    pub estimated: bool,
}

/// Plan a trip.
///
/// With `provider` set to `None` everything is estimated offline. `now` defaults
/// to the current time; its UTC date is the first log day and its timestamp
/// forms the trip id.
pub async fn plan_trip(
    request: &TripRequest,
    provider: Option<&dyn RoutingProvider>,
    settings: &PlannerConfig,
    now: Option<DateTime<Utc>>,
) -> TripResponse {
    let now = now.unwrap_or_else(Utc::now);
    let anchor = Coordinate::new(settings.anchor_lat, settings.anchor_lon);

    let (current, current_estimated) = resolve(provider, &request.current_address, anchor).await;
    let (pickup, pickup_estimated) = resolve(provider, &request.pickup_address, anchor).await;
    let (dropoff, dropoff_estimated) = resolve(provider, &request.dropoff_address, anchor).await;

    let waypoints = [current.coordinate, pickup.coordinate, dropoff.coordinate];
    let (route, route_estimated) = match fetch_route(provider, &waypoints).await {
        Some(route) => (route, false),
        None => (
            fallback::estimate_route(
                waypoints[0],
                waypoints[1],
                waypoints[2],
                settings.fallback_average_mph,
            ),
            true,
        ),
    };

    let total_miles = route.distance_miles.max(0.0).round() as u32;
    let driving_hours = route.duration_hours.max(0.0);
    let total_hours = driving_hours + TRIP_OVERHEAD_HOURS;
    info!(
        "route: {} mi, {:.1} h driving ({})",
        total_miles,
        driving_hours,
        if route_estimated { "estimated" } else { "provider" }
    );

    let fuel_stops = fuel::plan(&route.geometry, total_miles as f64);
    let plan = hos::generate(
        total_miles as f64,
        driving_hours,
        request.cycle_used_hours,
        now.date_naive(),
    );

    TripResponse {
        id: format!("trip-{}", now.timestamp_millis()),
        route_geometry: route.geometry,
        total_miles,
        total_hours: round1(total_hours),
        total_days: plan.daily_logs.len(),
        cycle_hours_remaining: round1(
            (hos::MAX_CYCLE - request.cycle_used_hours.max(0.0) - total_hours).max(0.0),
        ),
        fuel_stops,
        daily_logs: plan.daily_logs,
        current_location: current,
        pickup_location: pickup,
        dropoff_location: dropoff,
        completion: plan.completion,
        estimated: current_estimated || pickup_estimated || dropoff_estimated || route_estimated,
    }
}

/// First geocoding candidate, or an approximate location. The flag is true when
/// the location is approximate.
async fn resolve(
    provider: Option<&dyn RoutingProvider>,
    address: &str,
    anchor: Coordinate,
) -> (Location, bool) {
    if let Some(provider) = provider {
        match provider.geocode(address).await {
            Ok(candidates) => {
                if let Some(first) = candidates.into_iter().next() {
                    return (first, false);
                }
                warn!("Geocoding {address:?} returned no candidates");
            }
            Err(error) => warn!("Geocoding {address:?} failed: {error}"),
        }
        warn!("Using approximate location for {address:?}");
    }
    (fallback::approximate_location(address, anchor), true)
}

async fn fetch_route(
    provider: Option<&dyn RoutingProvider>,
    waypoints: &[Coordinate],
) -> Option<RouteSummary> {
    let provider = provider?;
    match provider.route(waypoints).await {
        Ok(route) => Some(route),
        Err(error) => {
            warn!("Routing failed: {error}");
            warn!("Falling back to great-circle estimate");
            None
        }
    }
}
