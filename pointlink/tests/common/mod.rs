//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use pointlink::{
    BuildError, EgressCostTable, FreeFormPoints, Linkage, LinkageBuilder, LinkageCacheConfig,
    LinkageKey, LinkedEdges, PointCost, PointSet, StreetNetwork,
};

// ============================================================================
// Networks
// ============================================================================

#[derive(Debug)]
pub struct TestNetwork {
    name: String,
    base: Option<Arc<dyn StreetNetwork>>,
}

impl StreetNetwork for TestNetwork {
    fn label(&self) -> &str {
        &self.name
    }

    fn base_network(&self) -> Option<&Arc<dyn StreetNetwork>> {
        self.base.as_ref()
    }
}

/// A network that is not derived from anything.
pub fn base_network(name: &str) -> Arc<dyn StreetNetwork> {
    Arc::new(TestNetwork {
        name: name.to_string(),
        base: None,
    })
}

/// A scenario copy of `base`.
pub fn scenario_of(name: &str, base: &Arc<dyn StreetNetwork>) -> Arc<dyn StreetNetwork> {
    Arc::new(TestNetwork {
        name: name.to_string(),
        base: Some(Arc::clone(base)),
    })
}

// ============================================================================
// Linked geometry
// ============================================================================

/// Fake linked edges: one origin per point, or the base table plus one extra
/// origin when the base table is available.
#[derive(Debug)]
pub struct StubEdges {
    points: usize,
    fail_costs: bool,
}

impl LinkedEdges for StubEdges {
    fn linked_point_count(&self) -> usize {
        self.points
    }

    fn compute_egress_costs(
        &self,
        base: Option<&EgressCostTable>,
    ) -> Result<EgressCostTable, BuildError> {
        if self.fail_costs {
            return Err(BuildError::new("egress cost computation failed"));
        }

        let mut rows: Vec<Vec<PointCost>> = match base {
            Some(table) => (0..table.origin_count())
                .map(|origin| table.costs_from(origin).to_vec())
                .collect(),
            None => (0..self.points)
                .map(|p| vec![PointCost::new(p as u32, 10 * p as u32)])
                .collect(),
        };
        if base.is_some() {
            rows.push(vec![PointCost::new(0, 1)]);
        }
        Ok(EgressCostTable::new(rows))
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder that counts invocations and records the order of built keys.
#[derive(Default)]
pub struct CountingBuilder {
    builds: AtomicUsize,
    order: Mutex<Vec<String>>,
    delay: Duration,
    fail_on: Option<String>,
    fail_costs: bool,
}

impl CountingBuilder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Builder that sleeps for `delay` before every build.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    /// Builder that fails for networks labelled `label`.
    pub fn failing_on(label: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            fail_on: Some(label.to_string()),
            ..Self::default()
        })
    }

    /// Builder whose linkages fail to compute egress costs.
    pub fn failing_costs() -> Arc<Self> {
        Arc::new(Self {
            fail_costs: true,
            ..Self::default()
        })
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Keys built so far, in build-completion order.
    pub fn order(&self) -> Vec<String> {
        self.order.lock().clone()
    }
}

impl LinkageBuilder for CountingBuilder {
    fn build(
        &self,
        point_set: &Arc<PointSet>,
        key: &LinkageKey,
        base: Option<Arc<Linkage>>,
    ) -> Result<Linkage, BuildError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.order.lock().push(key.to_string());

        if self.fail_on.as_deref() == Some(key.network().label()) {
            return Err(BuildError::new(format!("cannot link to {}", key)));
        }

        Ok(Linkage::new(
            point_set,
            key.clone(),
            base,
            StubEdges {
                points: point_set.feature_count(),
                fail_costs: self.fail_costs,
            },
        ))
    }
}

/// Builder that wrongly attaches every linkage to another point set.
pub struct ForeignBuilder {
    pub other: Arc<PointSet>,
}

impl LinkageBuilder for ForeignBuilder {
    fn build(
        &self,
        _point_set: &Arc<PointSet>,
        key: &LinkageKey,
        base: Option<Arc<Linkage>>,
    ) -> Result<Linkage, BuildError> {
        Ok(Linkage::new(
            &self.other,
            key.clone(),
            base,
            StubEdges {
                points: self.other.feature_count(),
                fail_costs: false,
            },
        ))
    }
}

// ============================================================================
// Point sets
// ============================================================================

pub fn sample_points() -> FreeFormPoints {
    FreeFormPoints::new(vec![(40.0, -73.0), (40.1, -73.1), (40.2, -73.2)])
}

pub fn point_set(builder: &Arc<CountingBuilder>, config: LinkageCacheConfig) -> Arc<PointSet> {
    PointSet::new(
        sample_points(),
        Arc::clone(builder) as Arc<dyn LinkageBuilder>,
        config,
    )
}
