//! Free-form point sets: explicit coordinates in no particular layout.

use super::PointSource;

/// Points given as explicit (latitude, longitude) pairs in degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeFormPoints {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl FreeFormPoints {
    /// Create a point source from (latitude, longitude) pairs.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        let (lats, lons) = points.into_iter().unzip();
        Self { lats, lons }
    }
}

impl PointSource for FreeFormPoints {
    fn feature_count(&self) -> usize {
        self.lats.len()
    }

    fn lat(&self, index: usize) -> f64 {
        self.lats[index]
    }

    fn lon(&self, index: usize) -> f64 {
        self.lons[index]
    }
}
