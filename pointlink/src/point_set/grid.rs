//! Gridded point sets in the Web Mercator projection.
//!
//! Points are the centres of the pixels of a rectangular block at a given
//! zoom level. Nothing is stored per point: coordinates are computed from the
//! point index, numbered row by row starting at the north-west pixel.

use super::PointSource;
use crate::coord::{
    lat_to_pixel, lon_to_pixel, pixel_center_lat, pixel_center_lon, CoordError, MAX_ZOOM,
    PIXELS_PER_TILE,
};

/// An implicit grid of points at Web Mercator pixel centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebMercatorGridPoints {
    zoom: u8,
    west: u32,
    north: u32,
    width: u32,
    height: u32,
}

impl WebMercatorGridPoints {
    /// Create a grid `width` × `height` pixels whose north-west pixel is
    /// (`west`, `north`) at `zoom`.
    pub fn new(
        zoom: u8,
        west: u32,
        north: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }

        let world = PIXELS_PER_TILE as u64 * (1u64 << zoom);
        let fits_world =
            west as u64 + width as u64 <= world && north as u64 + height as u64 <= world;
        let fits_index = (width as u64)
            .checked_mul(height as u64)
            .is_some_and(|count| usize::try_from(count).is_ok());
        if !fits_world || !fits_index {
            return Err(CoordError::GridTooLarge { width, height });
        }

        Ok(Self {
            zoom,
            west,
            north,
            width,
            height,
        })
    }

    /// Smallest grid at `zoom` covering the given bounds in degrees.
    ///
    /// Bounds touching the edge of the projection (180° or [`MIN_LAT`]) are
    /// covered by the last column or row of the world.
    ///
    /// [`MIN_LAT`]: crate::coord::MIN_LAT
    pub fn covering(
        zoom: u8,
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    ) -> Result<Self, CoordError> {
        if max_lat < min_lat {
            return Err(CoordError::InvertedBounds {
                min: min_lat,
                max: max_lat,
            });
        }
        if max_lon < min_lon {
            return Err(CoordError::InvertedBounds {
                min: min_lon,
                max: max_lon,
            });
        }

        let west = lon_to_pixel(min_lon, zoom)?;
        let east = lon_to_pixel(max_lon, zoom)?;
        // Pixel rows grow southward.
        let north = lat_to_pixel(max_lat, zoom)?;
        let south = lat_to_pixel(min_lat, zoom)?;

        let width = east - west + 1;
        let height = south - north + 1;
        Self::new(zoom, west, north, width, height)
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn row(&self, index: usize) -> u32 {
        self.north + (index / self.width as usize) as u32
    }

    fn col(&self, index: usize) -> u32 {
        self.west + (index % self.width as usize) as u32
    }
}

impl PointSource for WebMercatorGridPoints {
    fn feature_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn lat(&self, index: usize) -> f64 {
        pixel_center_lat(self.row(index), self.zoom)
    }

    fn lon(&self, index: usize) -> f64 {
        pixel_center_lon(self.col(index), self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::MIN_LAT;

    #[test]
    fn test_feature_count_is_area() {
        let grid = WebMercatorGridPoints::new(9, 100, 200, 4, 3).unwrap();
        assert_eq!(grid.feature_count(), 12);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.zoom(), 9);
    }

    #[test]
    fn test_indices_run_row_by_row() {
        let grid = WebMercatorGridPoints::new(9, 100, 200, 4, 3).unwrap();

        // Same row: latitude equal, longitude increasing eastward
        assert_eq!(grid.lat(0), grid.lat(3));
        assert!(grid.lon(1) > grid.lon(0));

        // Next row: same column, further south
        assert_eq!(grid.lon(0), grid.lon(4));
        assert!(grid.lat(4) < grid.lat(0));
    }

    #[test]
    fn test_covering_contains_bounds() {
        let grid = WebMercatorGridPoints::covering(10, 40.0, -74.1, 40.9, -73.7).unwrap();
        let last = grid.feature_count() - 1;

        let pixel_deg = 360.0 / (256.0 * 1024.0);
        assert!(grid.lon(0) <= -74.1 + pixel_deg);
        assert!(grid.lat(0) >= 40.9 - pixel_deg);
        assert!(grid.lon(last) >= -73.7 - pixel_deg);
        assert!(grid.lat(last) <= 40.0 + pixel_deg);
    }

    #[test]
    fn test_covering_bounds_at_world_edge() {
        let grid = WebMercatorGridPoints::covering(2, 10.0, 170.0, 20.0, 180.0).unwrap();
        assert_eq!(grid.width(), 29);

        let grid = WebMercatorGridPoints::covering(2, MIN_LAT, 170.0, 20.0, 180.0).unwrap();
        let last = grid.feature_count() - 1;
        assert_eq!(grid.col(last), 1023);
        assert_eq!(grid.row(last), 1023);
        assert!(grid.lon(last) < 180.0);
        assert!(grid.lat(last) > MIN_LAT);
    }

    #[test]
    fn test_covering_rejects_inverted_bounds() {
        assert_eq!(
            WebMercatorGridPoints::covering(10, 40.9, -74.1, 40.0, -73.7),
            Err(CoordError::InvertedBounds {
                min: 40.9,
                max: 40.0
            })
        );
        assert_eq!(
            WebMercatorGridPoints::covering(10, 40.0, -73.7, 40.9, -74.1),
            Err(CoordError::InvertedBounds {
                min: -73.7,
                max: -74.1
            })
        );
    }

    #[test]
    fn test_rejects_bad_zoom() {
        assert_eq!(
            WebMercatorGridPoints::new(25, 0, 0, 1, 1),
            Err(CoordError::InvalidZoom(25))
        );
    }

    #[test]
    fn test_rejects_grid_outside_world() {
        // Zoom 0 is a single 256 pixel tile
        assert_eq!(
            WebMercatorGridPoints::new(0, 200, 0, 100, 1),
            Err(CoordError::GridTooLarge {
                width: 100,
                height: 1
            })
        );
    }
}
