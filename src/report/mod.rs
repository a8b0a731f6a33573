//! Verdict reporting subsystem.
//!
//! # Responsibilities
//! - Represent the terminal pass/fail verdict of a run
//! - Deliver it as a kuberhealthy status report: a JSON POST of
//!   `{"Errors": [...], "OK": bool}` to the URL in `KH_REPORTING_URL`
//!
//! # Design Decisions
//! - The checker produces a `Verdict`; only this module knows the wire
//!   format and endpoint
//! - Delivery failures surface as `ReportError`; the caller decides the
//!   exit code

use serde::Serialize;
use thiserror::Error;

/// Terminal outcome of one check run. Produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No suspect pods remained after reconciliation.
    Success,
    /// One or more failure reasons, in reporting order.
    Failure(Vec<String>),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }
}

/// Errors that can occur while delivering a verdict.
#[derive(Debug, Error)]
pub enum ReportError {
    /// `KH_REPORTING_URL` is unset; there is nowhere to report to.
    #[error("KH_REPORTING_URL is not set")]
    MissingUrl,

    /// The POST itself failed (connection, DNS, timeout).
    #[error("error sending report: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("reporting endpoint returned status {0}")]
    BadStatus(reqwest::StatusCode),
}

/// Status body expected by the reporting endpoint.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    #[serde(rename = "Errors")]
    errors: &'a [String],
    #[serde(rename = "OK")]
    ok: bool,
}

/// Delivers verdicts to the reporting endpoint.
pub struct Reporter {
    url: String,
    client: reqwest::Client,
}

impl Reporter {
    /// Build a reporter for the endpoint named in `KH_REPORTING_URL`.
    pub fn from_env() -> Result<Self, ReportError> {
        let url = std::env::var("KH_REPORTING_URL").map_err(|_| ReportError::MissingUrl)?;
        Ok(Self::new(url))
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// POST the verdict. A success verdict reports OK with no errors; a
    /// failure verdict reports its reasons verbatim.
    pub async fn report(&self, verdict: &Verdict) -> Result<(), ReportError> {
        let (errors, ok): (&[String], bool) = match verdict {
            Verdict::Success => (&[], true),
            Verdict::Failure(reasons) => (reasons, false),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&StatusReport { errors, ok })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::BadStatus(response.status()));
        }

        tracing::info!(ok, errors = errors.len(), "Delivered check status");
        Ok(())
    }
}
