//! Egress cost tables.

/// Travel cost from one street-side origin to one linked point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointCost {
    /// Index of the point within its point set.
    pub point: u32,
    /// Travel time in seconds.
    pub seconds: u32,
}

impl PointCost {
    pub fn new(point: u32, seconds: u32) -> Self {
        Self { point, seconds }
    }
}

/// Precomputed travel costs from street origins (stops or edges) to points.
///
/// This is the most expensive part of a linkage to produce, which is why it
/// is computed lazily and shared once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EgressCostTable {
    costs: Vec<Vec<PointCost>>,
}

impl EgressCostTable {
    /// Create a table from per-origin cost lists, indexed by origin.
    pub fn new(costs: Vec<Vec<PointCost>>) -> Self {
        Self { costs }
    }

    /// Number of origins the table covers.
    pub fn origin_count(&self) -> usize {
        self.costs.len()
    }

    /// Costs from a single origin. Empty for unknown origins.
    pub fn costs_from(&self, origin: usize) -> &[PointCost] {
        self.costs.get(origin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of origin → point entries.
    pub fn entry_count(&self) -> usize {
        self.costs.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}
