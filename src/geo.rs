//! Great-circle distance and encoded-polyline decoding.

use crate::Coordinate;
use thiserror::Error;

/// Mean Earth radius in statute miles.
const EARTH_RADIUS_MI: f64 = 3958.8;

/// Precision used by GraphHopper and Google encoded polylines.
pub const POLYLINE_PRECISION: f64 = 1e5;

#[derive(Error, Debug, PartialEq)]
pub enum PolylineError {
    #[error("polyline ends mid-value at byte {0}")]
    Truncated(usize),

    #[error("invalid polyline byte {byte:#04x} at {index}")]
    InvalidByte { byte: u8, index: usize },

    #[error("polyline coordinate overflows at byte {index}")]
    Overflow { index: usize },
}

/// Haversine great-circle distance between two points, in miles.
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon * 0.5).sin().powi(2);

    EARTH_RADIUS_MI * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Decode an encoded polyline into `[lat, lon]` coordinates.
///
/// Each coordinate is stored as a zig-zag encoded delta from the previous one,
/// split into 5-bit chunks offset by 63 so the result is printable ASCII.
///
/// # Example
/// ```
/// use trip_planner_lib::geo::{decode_polyline, POLYLINE_PRECISION};
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", POLYLINE_PRECISION).unwrap();
/// assert_eq!(points.len(), 3);
/// assert!((points[0].lat - 38.5).abs() < 1e-9);
/// assert!((points[2].lon + 126.453).abs() < 1e-9);
/// ```
pub fn decode_polyline(encoded: &str, precision: f64) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let (mut lat, mut lon) = (0i64, 0i64);
    let mut coordinates = Vec::new();

    while index < bytes.len() {
        lat = lat
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow { index })?;
        lon = lon
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow { index })?;
        coordinates.push(Coordinate::new(
            lat as f64 / precision,
            lon as f64 / precision,
        ));
    }

    Ok(coordinates)
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let byte = *bytes.get(*index).ok_or(PolylineError::Truncated(*index))?;
        if !(63..=126).contains(&byte) || shift > 55 {
            return Err(PolylineError::InvalidByte {
                byte,
                index: *index,
            });
        }
        *index += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
