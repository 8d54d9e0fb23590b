//! # Offline Trip Estimation
//!
//! This module provides deterministic stand-ins for the routing provider when it
//! is unreachable, unconfigured or returns nothing useful.
//!
//! ## Route Estimate
//! - **Distance**: great-circle (haversine) miles for current → pickup plus
//!   pickup → drop-off
//! - **Time**: distance over a fixed average speed (55 mph by default)
//! - **Geometry**: just the three waypoints
//!
//! ## Location Estimate
//! When an address cannot be geocoded it is placed at a pseudo-random but
//! repeatable offset (±5° latitude, ±10° longitude) from a configured anchor,
//! derived from an xxHash64 of the address text. The display name carries an
//! `(Approximate)` suffix.
//!
//! ## Accuracy Trade-offs
//! - ✅ **Deterministic**: the same addresses always produce the same plan
//! - ✅ **Never fails**: any input yields a usable route
//! - ❌ **Underestimates road miles**: roads are longer than great circles
//! - ❌ **Fictional locations**: approximate places have no relation to the address
//!
//! Trips built from these estimates are marked `estimated` in the response.

use crate::geo::haversine_miles;
use crate::routing::RouteSummary;
use crate::{Coordinate, Location};
use twox_hash::XxHash64;

const LAT_SPREAD_DEG: f64 = 10.0;
const LON_SPREAD_DEG: f64 = 20.0;

/// Estimate a route through the three trip waypoints.
///
/// A non-positive or non-finite `average_mph` yields zero driving hours rather
/// than dividing by zero.
pub fn estimate_route(
    current: Coordinate,
    pickup: Coordinate,
    dropoff: Coordinate,
    average_mph: f64,
) -> RouteSummary {
    let distance_miles = haversine_miles(current, pickup) + haversine_miles(pickup, dropoff);
    let duration_hours = if average_mph.is_finite() && average_mph > 0.0 {
        distance_miles / average_mph
    } else {
        0.0
    };

    RouteSummary {
        geometry: vec![current, pickup, dropoff],
        distance_miles,
        duration_hours,
    }
}

/// Place an address that could not be geocoded near `anchor`.
pub fn approximate_location(address: &str, anchor: Coordinate) -> Location {
    let address = address.trim();
    let hash = XxHash64::oneshot(0, address.as_bytes());

    let lat_unit = (hash & 0xffff_ffff) as f64 / u32::MAX as f64 - 0.5;
    let lon_unit = (hash >> 32) as f64 / u32::MAX as f64 - 0.5;

    Location {
        display_name: format!("{address} (Approximate)"),
        coordinate: Coordinate::new(
            anchor.lat + lat_unit * LAT_SPREAD_DEG,
            anchor.lon + lon_unit * LON_SPREAD_DEG,
        ),
    }
}
