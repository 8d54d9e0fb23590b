//! # ELD Trip Planner Core Library
//!
//! This library turns a trip (current location → pickup → drop-off) into the
//! artifacts a commercial driver needs to stay compliant: a road route, a set of
//! fuel stops along it, and a day-by-day Hours-of-Service (HOS) log.
//!
//! ## Design Philosophy
//!
//! ### Pure Computation Core
//! - **Stateless engines**: [`fuel::plan`] and [`hos::generate`] are plain functions
//!   of their inputs. No I/O, no globals, no wall-clock reads.
//! - **Explicit start date**: the first log day is a parameter, so identical inputs
//!   always produce identical logs.
//! - **Total over numeric input**: negative, NaN or oversized values are clamped
//!   rather than rejected, and the day loop is bounded.
//!
//! ### Thin I/O Shell
//! Geocoding and routing live behind the [`routing::RoutingProvider`] trait. When a
//! provider fails the planner drops to the deterministic estimates in [`fallback`]
//! and marks the result as estimated instead of failing the request.
//!
//! ### Data Flow
//! 1. **Online**: geocode addresses → route through all three waypoints → plan
//! 2. **Offline**: approximate locations → great-circle legs at 55 mph → plan
//! 3. **Plan**: fuel stops and daily logs are computed independently, then merged
//!    into a [`trip::TripResponse`]
//!
//! ## Core Types
//!
//! - [`Coordinate`]: a latitude/longitude pair
//! - [`Location`]: a named coordinate produced by geocoding
//! - [`FuelStop`]: a planned refuelling point along the route
//! - [`DailyLog`]: one 24-hour page of the driver's log

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod fallback;
pub mod fuel;
pub mod geo;
pub mod hos;
pub mod renderer;
pub mod routing;
pub mod trip;

/// A WGS-84 geographic coordinate in decimal degrees.
///
/// # Example
/// ```
/// use trip_planner_lib::Coordinate;
///
/// let chicago = Coordinate::new(41.8781, -87.6298);
/// assert_eq!(chicago.lat, 41.8781);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Ordered path of coordinates describing a route.
///
/// Only used for proportional sampling (fuel stop placement); physical distance
/// always comes from the routing provider or the fallback estimate.
pub type RouteGeometry = Vec<Coordinate>;

/// A geocoded place: the human-readable name plus where it is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub display_name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// A planned refuelling point.
///
/// `distance_from_start` is the nominal mile marker (a multiple of the fuel
/// interval), not a distance measured along the geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    /// Sequential identifier, `fuel-1`, `fuel-2`, ...
    pub id: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Nominal miles from trip start
    pub distance_from_start: u32,
    /// Human-readable description, e.g. `Fuel Stop 1 - Mile 250`
    #[serde(rename = "address")]
    pub label: String,
}

/// Tags attached to a day of the log.
///
/// Serialised as the exact strings shown on a paper log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyNote {
    #[serde(rename = "Pickup")]
    Pickup,
    #[serde(rename = "Delivery")]
    Delivery,
    #[serde(rename = "30-min break")]
    Break,
    #[serde(rename = "34-hour restart")]
    Restart,
}

impl DutyNote {
    pub fn as_str(self) -> &'static str {
        match self {
            DutyNote::Pickup => "Pickup",
            DutyNote::Delivery => "Delivery",
            DutyNote::Break => "30-min break",
            DutyNote::Restart => "34-hour restart",
        }
    }
}

impl fmt::Display for DutyNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calendar day of the driver's Hours-of-Service log.
///
/// Hour fields are rounded to one decimal place. For every day:
/// - `on_duty_hours >= drive_hours` (on-duty includes driving)
/// - `on_duty_hours + off_duty_hours == 24` within 0.1 h of rounding
/// - `drive_hours <= 11` and `on_duty_hours <= 14` unless `is_rest_day`
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use trip_planner_lib::{DailyLog, DutyNote};
///
/// let restart = DailyLog {
///     day: 1,
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     drive_hours: 0.0,
///     on_duty_hours: 0.0,
///     off_duty_hours: 24.0,
///     miles: 0,
///     notes: vec![DutyNote::Restart],
///     is_rest_day: true,
/// };
///
/// assert_eq!(restart.non_driving_on_duty_hours(), 0.0);
/// assert_eq!(restart.total_hours(), 24.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// 1-based day index
    pub day: u32,
    pub date: NaiveDate,
    pub drive_hours: f64,
    /// Driving plus non-driving work (inspections, breaks)
    pub on_duty_hours: f64,
    pub off_duty_hours: f64,
    pub miles: u32,
    pub notes: Vec<DutyNote>,
    pub is_rest_day: bool,
}

impl DailyLog {
    /// On-duty time spent not driving.
    pub fn non_driving_on_duty_hours(&self) -> f64 {
        self.on_duty_hours - self.drive_hours
    }

    /// Driving + on-duty (not driving) + off-duty; should be 24.
    pub fn total_hours(&self) -> f64 {
        self.drive_hours + self.non_driving_on_duty_hours() + self.off_duty_hours
    }

    pub fn has_note(&self, note: DutyNote) -> bool {
        self.notes.contains(&note)
    }
}

/// Round to one decimal place, half away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
