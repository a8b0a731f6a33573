//! Pod Restarts Check (v1)
//!
//! A Kubernetes diagnostic check built with Tokio and kube-rs.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                POD RESTARTS CHECK                 │
//!                  │                                                   │
//!   Warning events │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   ───────────────┼─▶│ client  │───▶│ checker  │───▶│  suspect    │  │
//!                  │  │ (kube)  │    │ scan     │    │  registry   │  │
//!                  │  └─────────┘    └──────────┘    └──────┬──────┘  │
//!                  │                                        │         │
//!                  │                                        ▼         │
//!                  │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   Pod lookups    │  │ client  │◀───│ checker  │◀───│  deadline   │  │
//!   ───────────────┼─▶│ (kube)  │    │reconcile │    │  race       │  │
//!                  │  └─────────┘    └──────────┘    └──────┬──────┘  │
//!                  │                                        │         │
//!                  │                                        ▼         │
//!   Verdict        │                                 ┌─────────────┐  │
//!   ◀──────────────┼─────────────────────────────────│   report    │  │
//!                  │                                 └─────────────┘  │
//!                  └──────────────────────────────────────────────────┘
//! ```

use std::process;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pod_restarts_check::report::Reporter;
use pod_restarts_check::{CheckConfig, Checker, KubeCluster, Verdict};

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pod_restarts_check=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("pod-restarts-check v0.1.0 starting");

    // Load configuration from the environment
    let config = match CheckConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            // Malformed configuration aborts before any run starts; the
            // failure is still delivered so the orchestrator sees it.
            tracing::error!(error = %err, "Invalid configuration, aborting check");
            deliver_verdict(Verdict::Failure(vec![err.to_string()])).await;
            return;
        }
    };

    tracing::info!(
        namespace = %config.namespace_label(),
        max_failures_allowed = config.max_failures_allowed,
        check_timeout_secs = config.check_timeout.as_secs(),
        "Configuration loaded"
    );

    // Create the Kubernetes client
    let client = match KubeCluster::try_default().await {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "Unable to create Kubernetes client");
            process::exit(1);
        }
    };

    // Run the check and deliver the verdict
    let checker = Checker::new(config, client);
    let verdict = checker.run().await;

    deliver_verdict(verdict).await;
    tracing::info!("Done running Pod Restarts check");
}

/// Deliver a verdict to the reporting endpoint. Exits with code 2 when
/// the reporting pipeline itself fails; a delivered verdict lets the
/// process finish with code 0, whether it was a pass or a fail.
async fn deliver_verdict(verdict: Verdict) {
    let reporter = match Reporter::from_env() {
        Ok(reporter) => reporter,
        Err(err) => {
            tracing::error!(error = %err, "Reporting endpoint unavailable");
            process::exit(2);
        }
    };

    if let Err(err) = reporter.report(&verdict).await {
        tracing::error!(error = %err, "Error reporting verdict");
        process::exit(2);
    }

    match verdict {
        Verdict::Success => tracing::info!("Successfully reported success"),
        Verdict::Failure(reasons) => {
            tracing::info!(reasons = reasons.len(), "Successfully reported failure")
        }
    }
}
