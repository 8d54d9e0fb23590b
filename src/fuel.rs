//! # Fuel Stop Planning
//!
//! Places synthetic fuel stops every [`FUEL_INTERVAL_MILES`] along a route.
//!
//! Stops are sampled by *index proportion* into the geometry array rather than by
//! walking cumulative segment distance. Dense geometry in cities and sparse
//! geometry on interstates therefore skews where a stop lands on the map, while
//! the recorded mile marker stays nominal (`i * 250`).

use crate::{Coordinate, FuelStop};

/// Miles between planned fuel stops.
pub const FUEL_INTERVAL_MILES: u32 = 250;

/// Upper bound on stops for a single plan (2.5 million nominal miles).
pub const MAX_FUEL_STOPS: u32 = 10_000;

/// Plan fuel stops for a route of `total_miles`.
///
/// Returns `floor(total_miles / 250)` stops, or none when the route is empty or
/// the distance is shorter than one interval. The count is capped at
/// [`MAX_FUEL_STOPS`]. Never fails.
///
/// # Example
/// ```
/// use trip_planner_lib::{fuel, Coordinate};
///
/// let route: Vec<Coordinate> = (0..10).map(|i| Coordinate::new(40.0, -100.0 + i as f64)).collect();
/// let stops = fuel::plan(&route, 520.0);
///
/// assert_eq!(stops.len(), 2);
/// assert_eq!(stops[1].distance_from_start, 500);
/// ```
pub fn plan(route: &[Coordinate], total_miles: f64) -> Vec<FuelStop> {
    if route.is_empty() || !total_miles.is_finite() || total_miles <= 0.0 {
        return Vec::new();
    }

    let count = (total_miles / FUEL_INTERVAL_MILES as f64)
        .floor()
        .min(MAX_FUEL_STOPS as f64) as u32;
    let spacing = route.len() as f64 / (count as f64 + 1.0);
    let last = route.len() - 1;

    (1..=count)
        .map(|i| {
            let index = ((spacing * i as f64).floor() as usize).min(last);
            let mile = i * FUEL_INTERVAL_MILES;
            FuelStop {
                id: format!("fuel-{i}"),
                coordinate: route[index],
                distance_from_start: mile,
                label: format!("Fuel Stop {i} - Mile {mile}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_route(points: usize) -> Vec<Coordinate> {
        (0..points)
            .map(|i| Coordinate::new(35.0, -110.0 + i as f64 * 0.1))
            .collect()
    }

    #[test]
    fn short_trip_has_no_stops() {
        assert!(plan(&straight_route(50), 249.9).is_empty());
        assert!(plan(&straight_route(50), 0.0).is_empty());
    }

    #[test]
    fn empty_route_has_no_stops_regardless_of_distance() {
        assert!(plan(&[], 5000.0).is_empty());
    }

    #[test]
    fn pathological_distances_are_ignored() {
        let route = straight_route(10);
        assert!(plan(&route, -800.0).is_empty());
        assert!(plan(&route, f64::NAN).is_empty());
        assert!(plan(&route, f64::INFINITY).is_empty());
    }

    #[test]
    fn huge_distance_is_capped_without_overflow() {
        let route = straight_route(2);
        let stops = plan(&route, 1.2e12);

        assert_eq!(stops.len(), MAX_FUEL_STOPS as usize);
        let last = stops.last().unwrap();
        assert_eq!(last.distance_from_start, MAX_FUEL_STOPS * FUEL_INTERVAL_MILES);
        assert_eq!(last.id, format!("fuel-{MAX_FUEL_STOPS}"));
        assert!(stops.iter().all(|s| route.contains(&s.coordinate)));

        assert_eq!(plan(&route, f64::MAX).len(), MAX_FUEL_STOPS as usize);
    }

    #[test]
    fn stops_are_sampled_by_index_proportion() {
        let route = straight_route(100);
        let stops = plan(&route, 500.0);

        assert_eq!(stops.len(), 2);
        // 100 / 3 * 1 = 33.3 -> 33, 100 / 3 * 2 = 66.6 -> 66
        assert_eq!(stops[0].coordinate, route[33]);
        assert_eq!(stops[1].coordinate, route[66]);
    }

    #[test]
    fn stops_carry_sequential_ids_and_nominal_markers() {
        let stops = plan(&straight_route(40), 1010.0);

        assert_eq!(stops.len(), 4);
        for (n, stop) in stops.iter().enumerate() {
            let i = n as u32 + 1;
            assert_eq!(stop.id, format!("fuel-{i}"));
            assert_eq!(stop.distance_from_start, i * 250);
            assert_eq!(stop.label, format!("Fuel Stop {i} - Mile {}", i * 250));
        }
    }

    #[test]
    fn sparse_geometry_never_indexes_out_of_bounds() {
        // fallback routes only carry the three waypoints
        let route = straight_route(3);
        let stops = plan(&route, 2600.0);

        assert_eq!(stops.len(), 10);
        assert!(stops.iter().all(|s| route.contains(&s.coordinate)));
    }
}
