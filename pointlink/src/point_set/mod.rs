//! Point sets: destinations ("opportunities") of an accessibility analysis.
//!
//! A [`PointSet`] wraps a [`PointSource`] and owns everything derived from
//! it: one linkage store (see [`crate::cache`]) and at most one spatial index.
//! Point sets are compared by identity, never by coordinates, so they are
//! always handled through an `Arc`.
//!
//! # Linkage lookup
//!
//! ```text
//! get_linkage(D, walk)
//!   ├── unevictable tier hit ──────────────► return
//!   └── bounded tier (single-flight)
//!         ├── hit ─────────────────────────► return
//!         └── miss: build
//!               ├── D is a scenario copy of B
//!               │     └── get_linkage(B, walk)   (same point set, recursive)
//!               └── builder.build(self, (D, walk), base)
//! ```

mod freeform;
mod grid;

pub use freeform::FreeFormPoints;
pub use grid::WebMercatorGridPoints;

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, error, info};

use crate::cache::{DoubleBuildPolicy, LinkageCacheConfig, LinkageCacheStats, LinkageStore};
use crate::coord::FixedCoord;
use crate::error::LinkageError;
use crate::linkage::{Linkage, LinkageBuilder};
use crate::network::{LinkageKey, StreetNetwork, TravelMode};
use crate::spatial::SpatialIndex;

/// Indexed access to the coordinates of a set of points.
///
/// Coordinates must not change once a point set has been built on top of a
/// source. Indices run from `0` to `feature_count() - 1`; accessing an index
/// outside that range panics, like slice indexing.
pub trait PointSource: Send + Sync + fmt::Debug {
    fn feature_count(&self) -> usize;

    /// Latitude of the point at `index`, in degrees.
    fn lat(&self, index: usize) -> f64;

    /// Longitude of the point at `index`, in degrees.
    fn lon(&self, index: usize) -> f64;

    /// The point at `index` in fixed-point degrees.
    fn fixed_coordinate(&self, index: usize) -> FixedCoord {
        FixedCoord::from_degrees(self.lat(index), self.lon(index))
    }
}

/// A set of destination points together with its cached street linkages.
pub struct PointSet {
    source: Box<dyn PointSource>,
    builder: Arc<dyn LinkageBuilder>,
    linkages: LinkageStore,
    spatial_index: OnceLock<SpatialIndex>,
}

impl PointSet {
    /// Create a point set with empty caches.
    ///
    /// `config` is captured by this point set's linkage store; later changes to
    /// the caller's copy do not affect it.
    pub fn new(
        source: impl PointSource + 'static,
        builder: Arc<dyn LinkageBuilder>,
        config: LinkageCacheConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            source: Box::new(source),
            builder,
            linkages: LinkageStore::new(config),
            spatial_index: OnceLock::new(),
        })
    }

    pub fn source(&self) -> &dyn PointSource {
        self.source.as_ref()
    }

    pub fn feature_count(&self) -> usize {
        self.source.feature_count()
    }

    pub fn lat(&self, index: usize) -> f64 {
        self.source.lat(index)
    }

    pub fn lon(&self, index: usize) -> f64 {
        self.source.lon(index)
    }

    /// The point at `index` in fixed-point degrees.
    pub fn fixed_coordinate(&self, index: usize) -> FixedCoord {
        self.source.fixed_coordinate(index)
    }

    /// Find or build the linkage of this point set to `network` for `mode`.
    ///
    /// Linking is slow (nearest-edge search over the whole network), so
    /// results are cached. Concurrent calls for the same uncached key share a
    /// single build. If `network` is a scenario copy, the base network's
    /// linkage is resolved first and handed to the builder.
    ///
    /// # Errors
    ///
    /// - [`LinkageError::Build`] if the builder failed for this key or for a
    ///   base network along the scenario chain.
    /// - [`LinkageError::InvariantViolation`] if the resolved linkage belongs
    ///   to another point set.
    pub fn get_linkage(
        self: &Arc<Self>,
        network: &Arc<dyn StreetNetwork>,
        mode: TravelMode,
    ) -> Result<Arc<Linkage>, LinkageError> {
        let key = LinkageKey::new(Arc::clone(network), mode);
        debug!(key = %key, "Seeking linkage in cache");

        let linkage = self
            .linkages
            .get_or_try_build(&key, || self.build_cached_linkage(&key))?;

        if !linkage.belongs_to(self) {
            error!(
                key = %key,
                "A point set should only hold linkages for itself, not for other point sets"
            );
            self.linkages.invalidate(&key);
            return Err(LinkageError::InvariantViolation { key });
        }

        Ok(linkage)
    }

    /// Build a linkage on a bounded-tier miss.
    fn build_cached_linkage(
        self: &Arc<Self>,
        key: &LinkageKey,
    ) -> Result<Arc<Linkage>, LinkageError> {
        info!(key = %key, "Building linkage because it was not found in cache");

        // A scenario copy wraps a base network; link against the base first so
        // the builder only redoes the part of the work the scenario changed.
        let base = match key.base_key() {
            Some(base_key) => {
                info!(key = %key, base = %base_key, "Basing linkage on the base network's linkage");
                Some(self.get_linkage(base_key.network(), base_key.mode())?)
            }
            None => None,
        };

        let linkage = self
            .builder
            .build(self, key, base)
            .map_err(|source| LinkageError::Build {
                key: key.clone(),
                source: Arc::new(source),
            })?;

        Ok(Arc::new(linkage))
    }

    /// Build a linkage and keep it for the life of this point set.
    ///
    /// Bypasses the bounded tier entirely: the result is never evicted and is
    /// part of the point set's persisted state. The egress cost table is
    /// computed immediately, since it is the slowest part of a linkage and the
    /// one worth keeping.
    ///
    /// Meant for network construction, before query traffic starts. Running
    /// it concurrently with [`get_linkage`](Self::get_linkage) on the same key
    /// is a race.
    ///
    /// # Errors
    ///
    /// - [`LinkageError::DoubleBuild`] if the key is already cached and the
    ///   store is configured with [`DoubleBuildPolicy::Reject`].
    /// - [`LinkageError::Build`] or [`LinkageError::EgressCosts`] if building
    ///   fails.
    /// - [`LinkageError::InvariantViolation`] if the builder returned a linkage
    ///   for another point set.
    pub fn build_unevictable_linkage(
        self: &Arc<Self>,
        network: &Arc<dyn StreetNetwork>,
        mode: TravelMode,
    ) -> Result<(), LinkageError> {
        let key = LinkageKey::new(Arc::clone(network), mode);

        if self.linkages.contains(&key) {
            error!(key = %key, "Unevictable linkage is being built more than once");
            if self.linkages.config().double_build == DoubleBuildPolicy::Reject {
                return Err(LinkageError::DoubleBuild { key });
            }
        }

        info!(key = %key, "Building unevictable linkage");
        let linkage = self
            .builder
            .build(self, &key, None)
            .map_err(|source| LinkageError::Build {
                key: key.clone(),
                source: Arc::new(source),
            })?;

        if !linkage.belongs_to(self) {
            error!(key = %key, "Builder returned a linkage for a different point set");
            return Err(LinkageError::InvariantViolation { key });
        }

        let costs = linkage
            .egress_cost_table()
            .map_err(|source| LinkageError::EgressCosts {
                key: key.clone(),
                source: Arc::new(source),
            })?;
        info!(
            key = %key,
            origins = costs.origin_count(),
            entries = costs.entry_count(),
            "Unevictable linkage built"
        );

        self.linkages.insert_unevictable(key, Arc::new(linkage));
        Ok(())
    }

    /// A cached linkage for `network` and `mode`, without building one.
    pub fn linkage_if_present(
        &self,
        network: &Arc<dyn StreetNetwork>,
        mode: TravelMode,
    ) -> Option<Arc<Linkage>> {
        self.linkages.get(&LinkageKey::new(Arc::clone(network), mode))
    }

    /// The linkages persisted with this point set: the unevictable tier only.
    pub fn persisted_linkages(&self) -> Vec<Arc<Linkage>> {
        self.linkages.unevictable_linkages()
    }

    pub fn cache_stats(&self) -> LinkageCacheStats {
        self.linkages.stats()
    }

    /// Build the spatial index of this point set's points unless it exists.
    ///
    /// Concurrent first callers build the index once; everyone else waits for
    /// it. The index is never rebuilt afterwards.
    pub fn create_spatial_index_as_needed(&self) {
        self.spatial_index_or_build();
    }

    /// The spatial index, if it has been built.
    pub fn spatial_index(&self) -> Option<&SpatialIndex> {
        self.spatial_index.get()
    }

    /// Indices of the points inside the envelope spanned by two corners,
    /// building the spatial index first if necessary.
    pub fn points_in_envelope(&self, corner_a: FixedCoord, corner_b: FixedCoord) -> Vec<usize> {
        self.spatial_index_or_build().query(corner_a, corner_b)
    }

    fn spatial_index_or_build(&self) -> &SpatialIndex {
        self.spatial_index.get_or_init(|| {
            let index = SpatialIndex::build(self.source.as_ref());
            info!(points = index.len(), "Built point set spatial index");
            index
        })
    }
}

impl fmt::Debug for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointSet")
            .field("source", &self.source)
            .field("linkages", &self.linkages)
            .field("spatial_index", &self.spatial_index.get())
            .finish()
    }
}
