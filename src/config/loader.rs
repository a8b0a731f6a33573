//! Configuration loading from the environment.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::config::schema::{
    CheckConfig, DEFAULT_CHECK_TIMEOUT, DEFAULT_MAX_FAILURES_ALLOWED, NAMESPACE_ALL,
};

/// Safety margin subtracted from the orchestrator deadline so the verdict
/// can be delivered before the orchestrator gives up on us.
const DEADLINE_MARGIN: Duration = Duration::from_secs(5);

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `MAX_FAILURES_ALLOWED` was set but did not parse as an i32.
    #[error("error converting MAX_FAILURES_ALLOWED `{value}`: {source}")]
    InvalidMaxFailures {
        value: String,
        source: std::num::ParseIntError,
    },
}

impl CheckConfig {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<CheckConfig, ConfigError> {
        load(|key| std::env::var(key).ok(), SystemTime::now())
    }
}

/// Build a `CheckConfig` from an environment lookup. Split out from
/// [`CheckConfig::from_env`] so tests can supply their own environment
/// and clock.
fn load(
    env: impl Fn(&str) -> Option<String>,
    now: SystemTime,
) -> Result<CheckConfig, ConfigError> {
    // Namespace scope. Empty means cluster-wide.
    let namespace = env("POD_NAMESPACE").unwrap_or_default();
    if namespace == NAMESPACE_ALL {
        tracing::info!("Looking for pods across all namespaces, this requires a cluster role");
    } else {
        tracing::info!(namespace = %namespace, "Looking for pods in namespace");
    }

    // Runtime limit: orchestrator deadline minus a safety margin, with a
    // fixed default when the deadline is missing or malformed.
    let check_timeout = match env("KH_CHECK_RUN_DEADLINE") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(unix_secs) => timeout_until(unix_secs, now),
            Err(err) => {
                tracing::info!(value = %raw, error = %err, "Could not parse check deadline, using default timeout");
                DEFAULT_CHECK_TIMEOUT
            }
        },
        None => {
            tracing::info!("No check deadline set, using default timeout");
            DEFAULT_CHECK_TIMEOUT
        }
    };
    tracing::info!(check_timeout_secs = check_timeout.as_secs(), "Check time limit set");

    // Restart threshold. Present but unparseable is a startup abort.
    let max_failures_allowed = match env("MAX_FAILURES_ALLOWED") {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|source| ConfigError::InvalidMaxFailures { value: raw, source })?,
        None => DEFAULT_MAX_FAILURES_ALLOWED,
    };

    Ok(CheckConfig {
        namespace,
        check_timeout,
        max_failures_allowed,
    })
}

/// Time remaining until `deadline_unix_secs`, less the reporting margin.
/// A deadline already in the past yields a zero timeout; the run then
/// reports a timeout verdict immediately rather than hanging.
fn timeout_until(deadline_unix_secs: u64, now: SystemTime) -> Duration {
    let deadline = UNIX_EPOCH + Duration::from_secs(deadline_unix_secs);
    deadline
        .duration_since(now)
        .unwrap_or(Duration::ZERO)
        .saturating_sub(DEADLINE_MARGIN)
}
