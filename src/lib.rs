//! Pod Restarts Check Library
//!
//! A bounded-time diagnostic check for Kubernetes clusters: scans the
//! cluster's warning events for pods stuck in `BackOff`, verifies each
//! finding against current pod state, and reports a single pass/fail
//! verdict before a hard deadline.

pub mod checker;
pub mod client;
pub mod config;
pub mod report;

pub use checker::Checker;
pub use client::{ClusterError, ClusterQuery, KubeCluster, WarningEvent};
pub use config::CheckConfig;
pub use report::Verdict;
