//! Pod restarts checker subsystem.
//!
//! # Data Flow
//! ```text
//! Checker::run
//!     → spawn scan pipeline (background task)
//!         scan.rs: list warning events → populate suspect registry
//!         reconcile.rs: prune suspects whose pod is gone
//!         → send outcome over a oneshot channel
//!     → race: deadline timer vs. completion channel
//!     → Verdict (exactly one per run)
//!
//! Checker states:
//!     Idle → Scanning → {TimedOut | Completed} → Reported
//! ```
//!
//! # Design Decisions
//! - The registry is owned by the background task and travels inside the
//!   completion message, so the two tasks never share mutable state
//! - On timeout the background task is abandoned, not cancelled; its late
//!   send fails against the dropped receiver and is discarded
//! - `run` consumes the checker: one instance, one run, one verdict

pub mod reconcile;
pub mod registry;
pub mod scan;

pub use registry::{PodKey, SuspectRegistry};

use tokio::sync::oneshot;
use tokio::time;

use crate::client::{ClusterError, ClusterQuery};
use crate::config::CheckConfig;
use crate::report::Verdict;

/// Reason reported when the deadline elapses before the scan completes.
pub const TIMEOUT_MESSAGE: &str =
    "Failed to complete Pod Restart check in time! Timeout was reached.";

/// One bounded-time scan-and-reconcile run.
pub struct Checker<C> {
    config: CheckConfig,
    client: C,
}

/// What the scan pipeline hands back to the foreground task: the registry
/// it built, plus the error that stopped it, if any.
struct ScanOutcome {
    suspects: SuspectRegistry,
    error: Option<ClusterError>,
}

impl ScanOutcome {
    /// Reasons are the pipeline error first (when present), then every
    /// remaining registry message in key order.
    fn into_verdict(self) -> Verdict {
        let mut reasons = Vec::new();
        if let Some(err) = self.error {
            tracing::error!(error = %err, "Scan pipeline failed");
            reasons.push(err.to_string());
        }
        reasons.extend(self.suspects.into_messages());

        if reasons.is_empty() {
            Verdict::Success
        } else {
            Verdict::Failure(reasons)
        }
    }
}

impl<C> Checker<C>
where
    C: ClusterQuery + 'static,
{
    pub fn new(config: CheckConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Run the scan pipeline against the deadline and produce the verdict.
    pub async fn run(self) -> Verdict {
        tracing::info!("Running Pod Restarts checker");
        let timeout = self.config.check_timeout;
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            let outcome = self.scan_pipeline().await;
            // The receiver is gone once a timeout verdict was produced; a
            // late result must be discarded, never acted on.
            if done_tx.send(outcome).is_err() {
                tracing::debug!("Scan finished after the deadline, discarding result");
            }
        });

        tokio::select! {
            _ = time::sleep(timeout) => {
                tracing::error!(
                    timeout_secs = timeout.as_secs(),
                    "Check did not complete before the deadline"
                );
                Verdict::Failure(vec![TIMEOUT_MESSAGE.to_string()])
            }
            outcome = done_rx => match outcome {
                Ok(outcome) => outcome.into_verdict(),
                // Sender dropped without sending: the pipeline task panicked.
                Err(_) => Verdict::Failure(vec![
                    "Pod Restart scan task terminated unexpectedly".to_string(),
                ]),
            }
        }
    }

    /// Scanner then reconciler, sequentially, as one unit of work.
    async fn scan_pipeline(self) -> ScanOutcome {
        let mut suspects = SuspectRegistry::new();
        let result = async {
            scan::scan_events(&self.client, &self.config, &mut suspects).await?;
            reconcile::reconcile(&self.client, &mut suspects).await
        }
        .await;

        ScanOutcome {
            suspects,
            error: result.err(),
        }
    }
}
