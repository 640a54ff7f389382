//! PointLink - cached street-network linkages for accessibility analysis
//!
//! A [`PointSet`] is a set of destination points ("opportunities"). To compute
//! travel costs to those points, each one is linked to a nearby edge of a
//! street network for some travel mode. Linking is expensive and the same
//! linkages are requested over and over by concurrent analysis workers, so
//! every point set caches its linkages in two tiers:
//!
//! - an unevictable tier for linkages the network relies on for its whole
//!   lifetime (built explicitly with [`PointSet::build_unevictable_linkage`]);
//! - a bounded LRU tier filled on demand by [`PointSet::get_linkage`], where
//!   concurrent misses on one key share a single build and scenario networks
//!   are linked on top of their base network's linkage.
//!
//! The nearest-edge search, egress cost computation and street graph are
//! supplied by the host through [`LinkageBuilder`], [`LinkedEdges`] and
//! [`StreetNetwork`].

pub mod cache;
pub mod coord;
pub mod error;
pub mod linkage;
pub mod logging;
pub mod network;
pub mod point_set;
pub mod spatial;

pub use cache::{
    DoubleBuildPolicy, LinkageCacheConfig, LinkageCacheStats, DEFAULT_LINKAGE_CACHE_SIZE,
};
pub use coord::FixedCoord;
pub use error::LinkageError;
pub use linkage::{BuildError, EgressCostTable, Linkage, LinkageBuilder, LinkedEdges, PointCost};
pub use network::{LinkageKey, StreetNetwork, TravelMode};
pub use point_set::{FreeFormPoints, PointSet, PointSource, WebMercatorGridPoints};
pub use spatial::SpatialIndex;
