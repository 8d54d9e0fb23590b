//! # Routing and Geocoding Providers
//!
//! The planner talks to the outside world through [`RoutingProvider`]. The
//! production implementation, [`GraphHopperClient`], calls the GraphHopper
//! geocoding and routing APIs over HTTPS.
//!
//! ## Endpoints
//! - **Geocode**: `GET {base}/geocode?q=..&locale=en&limit=5&key=..`
//! - **Route**: `GET {base}/route?key=..&profile=..&points_encoded=true&point=lat,lon&point=..`
//!
//! Routes come back with distance in metres, time in milliseconds and the path as
//! an encoded polyline at 1e5 precision.
//!
//! ## Error Handling
//! Every failure mode (no key, network, non-2xx status, empty result, corrupt
//! geometry) surfaces as a [`RoutingError`]. The caller in [`crate::trip`] treats
//! all of them the same way: switch to the [`crate::fallback`] estimate.

use crate::config::RoutingConfig;
use crate::geo::{decode_polyline, PolylineError, POLYLINE_PRECISION};
use crate::{Coordinate, Location, RouteGeometry};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const METERS_PER_MILE: f64 = 1609.34;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Errors from a routing or geocoding provider.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// Network, timeout, status or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no routing API key configured")]
    MissingApiKey,

    #[error("no geocoding results for {0:?}")]
    NoResults(String),

    #[error("provider returned no route")]
    NoRoute,

    #[error("a route needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error("bad route geometry: {0}")]
    Polyline(#[from] PolylineError),
}

/// Aggregate result of routing through a list of waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSummary {
    pub geometry: RouteGeometry,
    pub distance_miles: f64,
    pub duration_hours: f64,
}

/// Source of geocoding and road routing.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Candidate locations for a free-text address, best match first.
    async fn geocode(&self, address: &str) -> Result<Vec<Location>, RoutingError>;

    /// Road route visiting `waypoints` in order.
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteSummary, RoutingError>;
}

/// [`RoutingProvider`] backed by the GraphHopper web API.
pub struct GraphHopperClient {
    http: reqwest::Client,
    config: RoutingConfig,
}

impl GraphHopperClient {
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn api_key(&self) -> Result<&str, RoutingError> {
        let key = self.config.api_key.trim();
        if key.is_empty() {
            Err(RoutingError::MissingApiKey)
        } else {
            Ok(key)
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl RoutingProvider for GraphHopperClient {
    async fn geocode(&self, address: &str) -> Result<Vec<Location>, RoutingError> {
        let key = self.api_key()?;
        debug!("geocoding {address:?}");

        let response: GeocodeResponse = self
            .http
            .get(self.endpoint("geocode"))
            .query(&[("q", address), ("locale", "en"), ("limit", "5"), ("key", key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let locations = response.into_locations(address);
        if locations.is_empty() {
            return Err(RoutingError::NoResults(address.to_string()));
        }
        Ok(locations)
    }

    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteSummary, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::TooFewWaypoints(waypoints.len()));
        }
        let key = self.api_key()?;

        let mut query: Vec<(&str, String)> = vec![
            ("key", key.to_string()),
            ("profile", self.config.profile.clone()),
            ("points_encoded", "true".to_string()),
            ("instructions", "false".to_string()),
        ];
        query.extend(
            waypoints
                .iter()
                .map(|p| ("point", format!("{},{}", p.lat, p.lon))),
        );
        debug!("routing through {} waypoints", waypoints.len());

        let response: RouteResponse = self
            .http
            .get(self.endpoint("route"))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_summary()
    }
}

// -- Wire Format --

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    hits: Vec<GeocodeHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    name: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    point: Option<GeocodePoint>,
}

#[derive(Debug, Deserialize)]
struct GeocodePoint {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<RoutePath>,
}

#[derive(Debug, Deserialize)]
struct RoutePath {
    /// metres
    distance: f64,
    /// milliseconds
    time: f64,
    points: String,
}

impl GeocodeResponse {
    /// Hits with a point, named `name, city, state, country` (blank parts skipped).
    fn into_locations(self, query: &str) -> Vec<Location> {
        self.hits
            .into_iter()
            .filter_map(|hit| {
                let point = hit.point?;
                let parts: Vec<&str> = [&hit.name, &hit.city, &hit.state, &hit.country]
                    .into_iter()
                    .filter_map(|part| part.as_deref())
                    .filter(|part| !part.trim().is_empty())
                    .collect();
                let display_name = if parts.is_empty() {
                    query.to_string()
                } else {
                    parts.join(", ")
                };
                Some(Location {
                    display_name,
                    coordinate: Coordinate::new(point.lat, point.lng),
                })
            })
            .collect()
    }
}

impl RouteResponse {
    fn into_summary(self) -> Result<RouteSummary, RoutingError> {
        let path = self.paths.into_iter().next().ok_or(RoutingError::NoRoute)?;
        Ok(RouteSummary {
            geometry: decode_polyline(&path.points, POLYLINE_PRECISION)?,
            distance_miles: path.distance / METERS_PER_MILE,
            duration_hours: path.time / MS_PER_HOUR,
        })
    }
}
