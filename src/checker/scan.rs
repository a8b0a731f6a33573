//! Event scanning phase.
//!
//! # Responsibilities
//! - List warning events once for the configured scope
//! - Qualify events: Pod subject, `BackOff` reason, count strictly above
//!   the threshold
//! - Record qualifying pods in the suspect registry

use crate::checker::registry::{PodKey, SuspectRegistry};
use crate::client::{ClusterQuery, ClusterResult, WarningEvent};
use crate::config::CheckConfig;

/// Kind of object whose events this check inspects.
const WORKLOAD_KIND: &str = "Pod";

/// Event reason treated as a recurring-failure signal.
const RECURRING_FAILURE_REASON: &str = "BackOff";

/// Populate `suspects` with every pod whose `BackOff` event count is
/// strictly greater than the configured threshold. A failure to list
/// events aborts the whole run.
pub async fn scan_events<C: ClusterQuery + ?Sized>(
    client: &C,
    config: &CheckConfig,
    suspects: &mut SuspectRegistry,
) -> ClusterResult<()> {
    tracing::info!(
        namespace = %config.namespace_label(),
        "Checking for pod BackOff events"
    );

    let events = client.list_warning_events(&config.namespace).await?;
    if events.is_empty() {
        return Ok(());
    }
    tracing::info!(
        events = events.len(),
        namespace = %config.namespace_label(),
        "Found warning events"
    );

    for event in events {
        if qualifies(&event, config.max_failures_allowed) {
            let message = format!(
                "Found: {} `BackOff` events for pod: {} in namespace: {}",
                event.count, event.name, event.namespace
            );
            tracing::info!(
                pod = %event.name,
                namespace = %event.namespace,
                count = event.count,
                "Pod exceeds restart threshold"
            );
            suspects.insert(PodKey::new(event.namespace, event.name), message);
        }
    }

    Ok(())
}

/// Strict threshold: a count equal to `max_failures_allowed` does not
/// qualify.
fn qualifies(event: &WarningEvent, max_failures_allowed: i32) -> bool {
    event.kind == WORKLOAD_KIND
        && event.reason == RECURRING_FAILURE_REASON
        && event.count > max_failures_allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClusterError;
    use async_trait::async_trait;

    /// Event source returning a fixed list, or failing outright.
    struct ScriptedEvents {
        events: Vec<WarningEvent>,
        list_error: Option<String>,
    }

    #[async_trait]
    impl ClusterQuery for ScriptedEvents {
        async fn list_warning_events(&self, _: &str) -> ClusterResult<Vec<WarningEvent>> {
            match &self.list_error {
                Some(msg) => Err(ClusterError::Api(msg.clone())),
                None => Ok(self.events.clone()),
            }
        }

        async fn get_pod(&self, _: &str, _: &str) -> ClusterResult<()> {
            unreachable!("scan phase never looks up pods")
        }
    }

    fn backoff_event(namespace: &str, name: &str, count: i32) -> WarningEvent {
        WarningEvent {
            kind: "Pod".into(),
            namespace: namespace.into(),
            name: name.into(),
            reason: "BackOff".into(),
            count,
        }
    }

    fn config(max_failures_allowed: i32) -> CheckConfig {
        CheckConfig {
            max_failures_allowed,
            ..CheckConfig::default()
        }
    }

    #[tokio::test]
    async fn test_count_above_threshold_qualifies() {
        let client = ScriptedEvents {
            events: vec![backoff_event("ns1", "p1", 6)],
            list_error: None,
        };
        let mut suspects = SuspectRegistry::new();

        scan_events(&client, &config(5), &mut suspects).await.unwrap();

        assert_eq!(suspects.len(), 1);
        assert_eq!(
            suspects.into_messages(),
            vec!["Found: 6 `BackOff` events for pod: p1 in namespace: ns1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_count_equal_to_threshold_does_not_qualify() {
        let client = ScriptedEvents {
            events: vec![backoff_event("ns1", "p1", 5)],
            list_error: None,
        };
        let mut suspects = SuspectRegistry::new();

        scan_events(&client, &config(5), &mut suspects).await.unwrap();

        assert!(suspects.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_kind_or_reason_does_not_qualify() {
        let mut node_event = backoff_event("ns1", "n1", 20);
        node_event.kind = "Node".into();
        let mut pull_event = backoff_event("ns1", "p2", 20);
        pull_event.reason = "FailedMount".into();

        let client = ScriptedEvents {
            events: vec![node_event, pull_event],
            list_error: None,
        };
        let mut suspects = SuspectRegistry::new();

        scan_events(&client, &config(5), &mut suspects).await.unwrap();

        assert!(suspects.is_empty());
    }

    #[tokio::test]
    async fn test_scan_is_idempotent() {
        let client = ScriptedEvents {
            events: vec![backoff_event("ns1", "p1", 6), backoff_event("ns2", "p2", 7)],
            list_error: None,
        };
        let cfg = config(5);

        let mut first = SuspectRegistry::new();
        scan_events(&client, &cfg, &mut first).await.unwrap();
        let mut second = first.clone();
        scan_events(&client, &cfg, &mut second).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_failure_aborts_scan() {
        let client = ScriptedEvents {
            events: vec![],
            list_error: Some("connection refused".into()),
        };
        let mut suspects = SuspectRegistry::new();

        let err = scan_events(&client, &config(5), &mut suspects)
            .await
            .expect_err("expected the list failure to propagate");

        assert_eq!(err.to_string(), "connection refused");
        assert!(suspects.is_empty());
    }
}
