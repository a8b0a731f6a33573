//! Configuration schema definitions.

use std::time::Duration;

/// Default restart threshold when `MAX_FAILURES_ALLOWED` is unset.
pub const DEFAULT_MAX_FAILURES_ALLOWED: i32 = 10;

/// Default runtime limit when no orchestrator deadline is available.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Sentinel namespace scope meaning "all namespaces".
pub const NAMESPACE_ALL: &str = "";

/// Immutable configuration for one check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Namespace to scan for events. Empty means all namespaces, which
    /// requires a cluster role.
    pub namespace: String,

    /// Hard wall-clock limit for the whole run.
    pub check_timeout: Duration,

    /// Restart threshold. A pod qualifies only when its `BackOff` event
    /// count is strictly greater than this value.
    pub max_failures_allowed: i32,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            namespace: NAMESPACE_ALL.to_string(),
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            max_failures_allowed: DEFAULT_MAX_FAILURES_ALLOWED,
        }
    }
}

impl CheckConfig {
    /// True when the scope spans every namespace.
    pub fn all_namespaces(&self) -> bool {
        self.namespace == NAMESPACE_ALL
    }

    /// Human-readable scope label for logging.
    pub fn namespace_label(&self) -> &str {
        if self.all_namespaces() {
            "<all namespaces>"
        } else {
            &self.namespace
        }
    }
}
