//! Linkages between point sets and street networks.
//!
//! A [`Linkage`] records which street edge each point of a [`PointSet`] was
//! snapped to for one network and travel mode, and lazily produces the
//! [`EgressCostTable`] from street origins to those points.

mod builder;
mod egress;

pub use builder::{BuildError, LinkageBuilder};
pub use egress::{EgressCostTable, PointCost};

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::network::{LinkageKey, StreetNetwork, TravelMode};
use crate::point_set::PointSet;

/// Geometry produced by the nearest-edge search for one linkage.
pub trait LinkedEdges: Send + Sync + fmt::Debug {
    /// Number of points that were linked to some edge.
    fn linked_point_count(&self) -> usize;

    /// Compute the egress cost table for these edges.
    ///
    /// `base` is the base linkage's table when it has already been computed;
    /// implementations may copy unchanged rows from it.
    fn compute_egress_costs(
        &self,
        base: Option<&EgressCostTable>,
    ) -> Result<EgressCostTable, BuildError>;
}

/// The association of one point set with one (network, mode) key.
pub struct Linkage {
    point_set: Weak<PointSet>,
    key: LinkageKey,
    base: Option<Arc<Linkage>>,
    edges: Box<dyn LinkedEdges>,
    egress_costs: Mutex<Option<Arc<EgressCostTable>>>,
}

impl Linkage {
    /// Create a linkage owned by `point_set`.
    ///
    /// The linkage keeps only a weak back-reference to its point set; the point
    /// set's cache is what keeps the linkage alive.
    pub fn new(
        point_set: &Arc<PointSet>,
        key: LinkageKey,
        base: Option<Arc<Linkage>>,
        edges: impl LinkedEdges + 'static,
    ) -> Self {
        Self {
            point_set: Arc::downgrade(point_set),
            key,
            base,
            edges: Box::new(edges),
            egress_costs: Mutex::new(None),
        }
    }

    /// The owning point set, unless it has already been dropped.
    pub fn point_set(&self) -> Option<Arc<PointSet>> {
        self.point_set.upgrade()
    }

    /// Whether this linkage was created for exactly this point set instance.
    ///
    /// Always false once the owner has been dropped, even if another point
    /// set now lives at the same address.
    pub fn belongs_to(&self, point_set: &PointSet) -> bool {
        self.point_set.strong_count() > 0 && std::ptr::eq(self.point_set.as_ptr(), point_set)
    }

    pub fn key(&self) -> &LinkageKey {
        &self.key
    }

    pub fn network(&self) -> &Arc<dyn StreetNetwork> {
        self.key.network()
    }

    pub fn mode(&self) -> TravelMode {
        self.key.mode()
    }

    /// The base network's linkage this one was derived from.
    pub fn base(&self) -> Option<&Arc<Linkage>> {
        self.base.as_ref()
    }

    pub fn edges(&self) -> &dyn LinkedEdges {
        self.edges.as_ref()
    }

    /// The egress cost table if it has already been computed.
    pub fn cached_egress_cost_table(&self) -> Option<Arc<EgressCostTable>> {
        self.egress_costs.lock().clone()
    }

    /// The egress cost table, computing it on first use.
    ///
    /// Concurrent callers wait for a single computation. A failed computation
    /// is not cached, so a later call retries.
    pub fn egress_cost_table(&self) -> Result<Arc<EgressCostTable>, BuildError> {
        let mut slot = self.egress_costs.lock();
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }

        let base_table = self
            .base
            .as_ref()
            .and_then(|base| base.cached_egress_cost_table());
        let table = Arc::new(self.edges.compute_egress_costs(base_table.as_deref())?);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }
}

impl fmt::Debug for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linkage")
            .field("key", &self.key)
            .field("base", &self.base.as_ref().map(|b| b.key().to_string()))
            .field("linked_points", &self.edges.linked_point_count())
            .field("has_egress_costs", &self.egress_costs.lock().is_some())
            .finish()
    }
}
