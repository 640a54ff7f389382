//! Linkage cache configuration.

use serde::Deserialize;

/// Default number of linkages held in the bounded tier of each point set.
///
/// Every scenario gets its own street network instance, so nine entries hold
/// walk, bicycle and car linkages for two scenarios plus the baseline.
pub const DEFAULT_LINKAGE_CACHE_SIZE: u64 = 9;

/// What to do when an unevictable linkage is built for a key that is already
/// cached in either tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleBuildPolicy {
    /// Log at error level, then build and overwrite the unevictable entry.
    #[default]
    LogAndOverwrite,
    /// Refuse the build with [`LinkageError::DoubleBuild`](crate::LinkageError::DoubleBuild).
    Reject,
}

/// Configuration captured by each point set's linkage cache at construction.
///
/// Changing a config value afterwards has no effect on caches that already
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkageCacheConfig {
    /// Maximum number of entries in the bounded (evictable) tier.
    pub capacity: u64,

    /// Handling of repeated unevictable builds.
    pub double_build: DoubleBuildPolicy,
}

impl Default for LinkageCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LINKAGE_CACHE_SIZE,
            double_build: DoubleBuildPolicy::default(),
        }
    }
}

impl LinkageCacheConfig {
    /// Set the bounded tier capacity.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the double-build policy.
    pub fn with_double_build(mut self, policy: DoubleBuildPolicy) -> Self {
        self.double_build = policy;
        self
    }
}
