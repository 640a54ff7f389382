//! The seam to the geometric linking code.
//!
//! Nearest-edge search and egress cost computation are provided by the host
//! application. The cache only decides *when* a linkage gets built and hands
//! the builder whatever base linkage it already has.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use super::Linkage;
use crate::network::LinkageKey;
use crate::point_set::PointSet;

/// Failure reported by a [`LinkageBuilder`] or an egress cost computation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BuildError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl BuildError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, e.g. a failed geometry operation.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Builds linkages between a point set and a street network.
///
/// Implementations must construct the result with [`Linkage::new`] for the
/// point set they were given. When `base` is present it is the linkage of the
/// same point set to the key's base network, and the builder may reuse its
/// geometry and costs for the parts of the network the scenario left intact.
pub trait LinkageBuilder: Send + Sync {
    fn build(
        &self,
        point_set: &Arc<PointSet>,
        key: &LinkageKey,
        base: Option<Arc<Linkage>>,
    ) -> Result<Linkage, BuildError>;
}
