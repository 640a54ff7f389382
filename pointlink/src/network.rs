//! Street network handles and linkage cache keys.
//!
//! The street graph itself lives outside this crate. A point set only needs to
//! know which network it is linking against, whether that network is a
//! scenario copy, and if so which base network it was derived from.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Deserialize;

/// On-street travel mode used when linking points to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walk,
    Bicycle,
    Car,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TravelMode::Walk => "walk",
            TravelMode::Bicycle => "bicycle",
            TravelMode::Car => "car",
        };
        f.write_str(name)
    }
}

/// A street network that point sets can be linked to.
///
/// A network is either a base network or a scenario copy derived from exactly
/// one base network by applying a set of modifications. The derivation chain
/// never contains cycles.
pub trait StreetNetwork: Send + Sync + fmt::Debug {
    /// Human-readable name used in diagnostics.
    fn label(&self) -> &str;

    /// The network this one was derived from, if it is a scenario copy.
    fn base_network(&self) -> Option<&Arc<dyn StreetNetwork>>;

    /// Whether this network is a scenario copy of a base network.
    fn is_scenario_copy(&self) -> bool {
        self.base_network().is_some()
    }
}

/// Cache key for a linkage: network identity plus travel mode.
///
/// Two keys are equal only when they refer to the same network instance; two
/// structurally identical networks are different keys. The key holds a strong
/// reference so the network's address cannot be reused while it is cached.
#[derive(Clone)]
pub struct LinkageKey {
    network: Arc<dyn StreetNetwork>,
    mode: TravelMode,
}

impl LinkageKey {
    pub fn new(network: Arc<dyn StreetNetwork>, mode: TravelMode) -> Self {
        Self { network, mode }
    }

    pub fn network(&self) -> &Arc<dyn StreetNetwork> {
        &self.network
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Key for the same mode on this key's base network, if any.
    pub fn base_key(&self) -> Option<LinkageKey> {
        self.network
            .base_network()
            .map(|base| LinkageKey::new(Arc::clone(base), self.mode))
    }

    fn network_addr(&self) -> *const () {
        Arc::as_ptr(&self.network) as *const ()
    }
}

impl PartialEq for LinkageKey {
    fn eq(&self, other: &Self) -> bool {
        self.network_addr() == other.network_addr() && self.mode == other.mode
    }
}

impl Eq for LinkageKey {}

impl Hash for LinkageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.network_addr().hash(state);
        self.mode.hash(state);
    }
}

impl fmt::Display for LinkageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.network.label(), self.mode)
    }
}

impl fmt::Debug for LinkageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkageKey")
            .field("network", &self.network.label())
            .field("addr", &self.network_addr())
            .field("mode", &self.mode)
            .finish()
    }
}
