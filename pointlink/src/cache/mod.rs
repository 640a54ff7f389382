//! Two-tier linkage cache with LRU eviction using moka.
//!
//! Every [`PointSet`](crate::PointSet) owns one [`LinkageStore`]:
//!
//! - **Unevictable tier**: a plain map for linkages that must stay in memory
//!   for the life of the point set (e.g. the baseline walk linkage the network
//!   itself keeps a reference to). Entries are never dropped, and this tier is
//!   the only part of the store that is persisted with the point set.
//! - **Bounded tier**: a `moka::sync::Cache` with LRU eviction and a fixed
//!   entry capacity. Losing an entry only costs a rebuild.
//!
//! Misses in the bounded tier are resolved with moka's `try_get_with`, so
//! concurrent callers asking for the same key share a single build and all
//! receive the same `Arc<Linkage>` (or the same error).

mod config;

pub use config::{DoubleBuildPolicy, LinkageCacheConfig, DEFAULT_LINKAGE_CACHE_SIZE};

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::LinkageError;
use crate::linkage::Linkage;
use crate::network::LinkageKey;

/// Snapshot of a store's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkageCacheStats {
    /// Calls that went through the cache lookup path.
    pub lookups: u64,
    /// Lookups answered by the unevictable tier.
    pub unevictable_hits: u64,
    /// Builds started for bounded-tier misses.
    pub builds: u64,
    /// Entries evicted from the bounded tier.
    pub evictions: u64,
    /// Entries currently in the unevictable tier.
    pub unevictable_entries: u64,
    /// Entries currently in the bounded tier.
    pub evictable_entries: u64,
}

impl fmt::Display for LinkageCacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "linkages: {} lookups, {} builds, {} evictions ({} unevictable, {} cached)",
            self.lookups,
            self.builds,
            self.evictions,
            self.unevictable_entries,
            self.evictable_entries
        )
    }
}

/// Per-point-set storage for linkages.
pub struct LinkageStore {
    unevictable: RwLock<HashMap<LinkageKey, Arc<Linkage>>>,
    evictable: Cache<LinkageKey, Arc<Linkage>>,
    config: LinkageCacheConfig,
    lookups: AtomicU64,
    unevictable_hits: AtomicU64,
    builds: AtomicU64,
    /// Shared with the eviction listener, which has no access to `self`.
    evictions: Arc<AtomicU64>,
}

impl LinkageStore {
    /// Create an empty store. The config is fixed for the store's lifetime.
    pub fn new(config: LinkageCacheConfig) -> Self {
        let evictions = Arc::new(AtomicU64::new(0));
        let listener_evictions = Arc::clone(&evictions);

        let evictable = Cache::builder()
            .max_capacity(config.capacity)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(
                move |key: Arc<LinkageKey>, _linkage: Arc<Linkage>, cause: RemovalCause| {
                    if cause.was_evicted() {
                        listener_evictions.fetch_add(1, Ordering::Relaxed);
                        warn!(key = %key, cause = ?cause, "Linkage cache eviction");
                    }
                },
            )
            .build();

        Self {
            unevictable: RwLock::new(HashMap::new()),
            evictable,
            config,
            lookups: AtomicU64::new(0),
            unevictable_hits: AtomicU64::new(0),
            builds: AtomicU64::new(0),
            evictions,
        }
    }

    pub fn config(&self) -> &LinkageCacheConfig {
        &self.config
    }

    /// Look a key up in the unevictable tier, then the bounded tier, without
    /// building anything.
    pub fn get(&self, key: &LinkageKey) -> Option<Arc<Linkage>> {
        let pinned = self.unevictable.read().get(key).cloned();
        pinned.or_else(|| self.evictable.get(key))
    }

    /// Whether either tier holds the key. Does not touch LRU order.
    pub fn contains(&self, key: &LinkageKey) -> bool {
        self.unevictable.read().contains_key(key) || self.evictable.contains_key(key)
    }

    /// Resolve a key, running `build` on a bounded-tier miss.
    ///
    /// Concurrent misses on the same key run `build` once; the other callers
    /// block until it finishes and receive its result. A failed build leaves
    /// the key absent, so the next call retries. `build` may resolve other
    /// keys of this store (but never the same key).
    pub fn get_or_try_build<F>(
        &self,
        key: &LinkageKey,
        build: F,
    ) -> Result<Arc<Linkage>, LinkageError>
    where
        F: FnOnce() -> Result<Arc<Linkage>, LinkageError>,
    {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let pinned = self.unevictable.read().get(key).cloned();
        if let Some(linkage) = pinned {
            self.unevictable_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Linkage found in unevictable tier");
            return Ok(linkage);
        }

        let mut built = false;
        let result = self.evictable.try_get_with(key.clone(), || {
            built = true;
            self.builds.fetch_add(1, Ordering::Relaxed);
            build()
        });

        if built {
            // Apply the capacity bound now rather than on a later access
            self.evictable.run_pending_tasks();
        }

        result.map_err(|shared| (*shared).clone())
    }

    /// Store a linkage in the unevictable tier, returning any entry it replaced.
    pub fn insert_unevictable(
        &self,
        key: LinkageKey,
        linkage: Arc<Linkage>,
    ) -> Option<Arc<Linkage>> {
        self.unevictable.write().insert(key, linkage)
    }

    /// Drop a key from the bounded tier. The unevictable tier is never touched.
    pub fn invalidate(&self, key: &LinkageKey) {
        self.evictable.invalidate(key);
    }

    /// All linkages in the unevictable tier: the state that is persisted with
    /// the point set.
    pub fn unevictable_linkages(&self) -> Vec<Arc<Linkage>> {
        self.unevictable.read().values().cloned().collect()
    }

    /// Get store statistics.
    pub fn stats(&self) -> LinkageCacheStats {
        self.evictable.run_pending_tasks();
        LinkageCacheStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            unevictable_hits: self.unevictable_hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            unevictable_entries: self.unevictable.read().len() as u64,
            evictable_entries: self.evictable.entry_count(),
        }
    }
}

impl fmt::Debug for LinkageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkageStore")
            .field("config", &self.config)
            .field("unevictable", &self.unevictable.read().len())
            .field("evictable", &self.evictable.entry_count())
            .finish()
    }
}
