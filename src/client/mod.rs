//! Cluster query subsystem.
//!
//! # Data Flow
//! ```text
//! checker scan phase
//!     → ClusterQuery::list_warning_events (one list call, type=Warning)
//!     → flattened WarningEvent values
//!
//! checker reconcile phase
//!     → ClusterQuery::get_pod (point lookup per suspect)
//!     → Ok, NotFound, or a fatal Api error
//! ```
//!
//! # Design Decisions
//! - The checker depends on the `ClusterQuery` trait, never on kube
//!   directly, so tests can script cluster responses
//! - NotFound is a distinct error variant: the reconciler treats it as a
//!   prune signal, everything else as fatal

pub mod kube;

pub use kube::KubeCluster;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while querying the cluster.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The queried object does not exist. An expected signal during
    /// reconciliation, never a check failure.
    #[error("pod {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    /// The API call failed for any other reason (network, auth, server
    /// error). Fatal to the current run.
    #[error("{0}")]
    Api(String),
}

impl ClusterError {
    /// True for the not-found prune signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound { .. })
    }
}

/// Result type for cluster queries.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// A warning-class cluster event, flattened to the fields the scanner
/// qualifies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningEvent {
    /// Kind of the involved object (e.g. "Pod").
    pub kind: String,
    /// Namespace of the involved object.
    pub namespace: String,
    /// Name of the involved object.
    pub name: String,
    /// Event reason tag (e.g. "BackOff").
    pub reason: String,
    /// Number of times this event has been observed.
    pub count: i32,
}

/// Read-only cluster access consumed by the checker.
#[async_trait]
pub trait ClusterQuery: Send + Sync {
    /// List all warning events in `namespace`, or cluster-wide when
    /// `namespace` is empty.
    async fn list_warning_events(&self, namespace: &str) -> ClusterResult<Vec<WarningEvent>>;

    /// Point lookup for a pod. Returns `ClusterError::NotFound` when the
    /// pod does not exist.
    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<()>;
}
