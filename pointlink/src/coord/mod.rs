//! Coordinate conversion module
//!
//! Provides conversions between floating-point geographic coordinates and the
//! fixed-point integer degrees used for deterministic spatial indexing, plus
//! the Web Mercator pixel math behind gridded point sets.

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

/// Scale between floating degrees and fixed-point degrees (seven decimal places).
pub const FIXED_FACTOR: f64 = 1e7;

/// Web Mercator tiles are 256×256 pixels.
pub const PIXELS_PER_TILE: u32 = 256;

/// Highest zoom level accepted for gridded point sets.
pub const MAX_ZOOM: u8 = 24;

/// Latitude bounds of the Web Mercator projection.
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Errors raised when coordinates fall outside supported ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    #[error("Invalid zoom level: {0} (must be at most {MAX_ZOOM})")]
    InvalidZoom(u8),

    #[error("Grid of {width}x{height} pixels is too large to index")]
    GridTooLarge { width: u32, height: u32 },

    #[error("Inverted bounds: minimum {min} is greater than maximum {max}")]
    InvertedBounds { min: f64, max: f64 },
}

/// Converts floating degrees to fixed-point degrees.
///
/// The fractional part beyond seven decimal places is truncated toward zero,
/// so the same input always produces the same integer.
#[inline]
pub fn floating_to_fixed(degrees: f64) -> i32 {
    (degrees * FIXED_FACTOR) as i32
}

/// Converts fixed-point degrees back to floating degrees.
#[inline]
pub fn fixed_to_floating(fixed: i32) -> f64 {
    fixed as f64 / FIXED_FACTOR
}

/// A coordinate in fixed-point degrees, x (longitude) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedCoord {
    pub lon: i32,
    pub lat: i32,
}

impl FixedCoord {
    /// Builds a fixed-point coordinate from floating latitude and longitude.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lon: floating_to_fixed(lon),
            lat: floating_to_fixed(lat),
        }
    }

    /// The coordinate as an `[x, y]` pair, the layout used by the spatial index.
    #[inline]
    pub fn to_array(self) -> [i32; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for FixedCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.7}, {:.7})",
            fixed_to_floating(self.lat),
            fixed_to_floating(self.lon)
        )
    }
}

#[inline]
fn world_pixels(zoom: u8) -> f64 {
    PIXELS_PER_TILE as f64 * 2.0_f64.powi(zoom as i32)
}

/// Longitude of the western edge of pixel column `x` at the given zoom.
#[inline]
pub fn pixel_to_lon(x: f64, zoom: u8) -> f64 {
    x / world_pixels(zoom) * 360.0 - 180.0
}

/// Latitude of the northern edge of pixel row `y` at the given zoom.
///
/// Uses the inverse Web Mercator projection.
#[inline]
pub fn pixel_to_lat(y: f64, zoom: u8) -> f64 {
    let y = y / world_pixels(zoom);
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    lat_rad * 180.0 / PI
}

/// Longitude of the centre of pixel column `x`.
#[inline]
pub fn pixel_center_lon(x: u32, zoom: u8) -> f64 {
    pixel_to_lon(x as f64 + 0.5, zoom)
}

/// Latitude of the centre of pixel row `y`.
#[inline]
pub fn pixel_center_lat(y: u32, zoom: u8) -> f64 {
    pixel_to_lat(y as f64 + 0.5, zoom)
}

/// Pixel column containing the given longitude.
///
/// The antimeridian at +180° belongs to the last column.
pub fn lon_to_pixel(lon: f64, zoom: u8) -> Result<u32, CoordError> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    let x = (lon + 180.0) / 360.0 * world_pixels(zoom);
    Ok(x.min(world_pixels(zoom) - 1.0) as u32)
}

/// Pixel row containing the given latitude.
///
/// [`MIN_LAT`] belongs to the last row.
pub fn lat_to_pixel(lat: f64, zoom: u8) -> Result<u32, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    let lat_rad = lat * PI / 180.0;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * world_pixels(zoom);
    Ok(y.min(world_pixels(zoom) - 1.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_floating_to_fixed_scales_by_seven_places() {
        assert_eq!(floating_to_fixed(40.0), 400_000_000);
        assert_eq!(floating_to_fixed(-73.1), -731_000_000);
        assert_eq!(floating_to_fixed(0.0), 0);
    }

    #[test]
    fn test_floating_to_fixed_truncates_toward_zero() {
        assert_eq!(floating_to_fixed(0.000_000_19), 1);
        assert_eq!(floating_to_fixed(-0.000_000_19), -1);
    }

    #[test]
    fn test_fixed_coord_is_lon_first() {
        let coord = FixedCoord::from_degrees(40.0, -73.0);
        assert_eq!(coord.to_array(), [-730_000_000, 400_000_000]);
    }

    #[test]
    fn test_fixed_coord_display() {
        let coord = FixedCoord::from_degrees(40.5, -73.25);
        assert_eq!(coord.to_string(), "(40.5000000, -73.2500000)");
    }

    #[test]
    fn test_pixel_zero_is_northwest_corner() {
        assert!((pixel_to_lon(0.0, 0) - -180.0).abs() < 1e-9);
        assert!((pixel_to_lat(0.0, 0) - MAX_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_center_of_world_at_zoom_zero() {
        assert!(pixel_to_lon(128.0, 0).abs() < 1e-9);
        assert!(pixel_to_lat(128.0, 0).abs() < 1e-9);
    }

    #[test]
    fn test_new_york_pixel_round_trip() {
        let zoom = 9;
        let x = lon_to_pixel(-74.0060, zoom).unwrap();
        let y = lat_to_pixel(40.7128, zoom).unwrap();

        let lon = pixel_center_lon(x, zoom);
        let lat = pixel_center_lat(y, zoom);
        assert!((lon - -74.0060).abs() < 0.01, "lon was {}", lon);
        assert!((lat - 40.7128).abs() < 0.01, "lat was {}", lat);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert_eq!(
            lat_to_pixel(89.0, 10),
            Err(CoordError::InvalidLatitude(89.0))
        );
        assert_eq!(
            lon_to_pixel(181.0, 10),
            Err(CoordError::InvalidLongitude(181.0))
        );
        assert_eq!(lon_to_pixel(0.0, 30), Err(CoordError::InvalidZoom(30)));
    }

    #[test]
    fn test_world_edges_map_to_last_pixel() {
        assert_eq!(lon_to_pixel(180.0, 2), Ok(1023));
        assert_eq!(lat_to_pixel(MIN_LAT, 2), Ok(1023));
        assert_eq!(lon_to_pixel(-180.0, 2), Ok(0));
        assert_eq!(lat_to_pixel(MAX_LAT, 2), Ok(0));

        // 2^32 pixels wide: the last column is u32::MAX
        assert_eq!(lon_to_pixel(180.0, MAX_ZOOM), Ok(u32::MAX));
    }

    proptest! {
        #[test]
        fn prop_fixed_round_trip_within_resolution(degrees in -180.0f64..180.0) {
            let back = fixed_to_floating(floating_to_fixed(degrees));
            prop_assert!((back - degrees).abs() < 1.0 / FIXED_FACTOR + 1e-12);
        }

        #[test]
        fn prop_fixed_conversion_is_monotonic(a in -180.0f64..180.0, b in -180.0f64..180.0) {
            if a <= b {
                prop_assert!(floating_to_fixed(a) <= floating_to_fixed(b));
            }
        }
    }
}
