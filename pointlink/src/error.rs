//! Errors returned by point set linkage operations.

use std::sync::Arc;

use thiserror::Error;

use crate::linkage::BuildError;
use crate::network::LinkageKey;

/// Errors that can occur while resolving or building linkages.
///
/// The error is `Clone` so that one failed build can be handed to every caller
/// that was waiting on it; the builder's error is shared through an `Arc`.
#[derive(Debug, Clone, Error)]
pub enum LinkageError {
    /// The linkage builder failed.
    #[error("Failed to link point set to {key}: {source}")]
    Build {
        key: LinkageKey,
        source: Arc<BuildError>,
    },

    /// A cached linkage belongs to a different point set.
    #[error("Linkage for {key} belongs to a different point set")]
    InvariantViolation { key: LinkageKey },

    /// An unevictable linkage was requested for a key that is already cached.
    #[error("Unevictable linkage for {key} is being built more than once")]
    DoubleBuild { key: LinkageKey },

    /// Computing the egress cost table of a new linkage failed.
    #[error("Failed to compute egress costs for {key}: {source}")]
    EgressCosts {
        key: LinkageKey,
        source: Arc<BuildError>,
    },
}

impl LinkageError {
    /// The key the failed operation was resolving.
    pub fn key(&self) -> &LinkageKey {
        match self {
            LinkageError::Build { key, .. }
            | LinkageError::InvariantViolation { key }
            | LinkageError::DoubleBuild { key }
            | LinkageError::EgressCosts { key, .. } => key,
        }
    }

    /// The underlying builder failure, if any.
    pub fn build_error(&self) -> Option<&Arc<BuildError>> {
        match self {
            LinkageError::Build { source, .. } | LinkageError::EgressCosts { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
