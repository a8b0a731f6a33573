//! Existence reconciliation phase.
//!
//! # Responsibilities
//! - Re-check every suspect against current cluster state
//! - Drop suspects whose pod no longer exists (events outlive pods; a
//!   deleted pod must not fail the probe)
//! - Abort the run on any other lookup failure
//!
//! # Design Decisions
//! - Pure filter: never adds keys, only removes them
//! - Lookups are sequential; the overall deadline is the only bound

use crate::checker::registry::SuspectRegistry;
use crate::client::{ClusterQuery, ClusterResult};

/// Remove every suspect whose pod no longer exists. Any lookup error
/// other than not-found propagates and terminates the run.
pub async fn reconcile<C: ClusterQuery + ?Sized>(
    client: &C,
    suspects: &mut SuspectRegistry,
) -> ClusterResult<()> {
    for key in suspects.keys() {
        match client.get_pod(&key.namespace, &key.name).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::info!(pod = %key, "Suspect pod no longer exists, removing from registry");
                suspects.remove(&key);
            }
            Err(err) => {
                tracing::warn!(pod = %key, error = %err, "Error getting suspect pod");
                return Err(err);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::registry::PodKey;
    use crate::client::ClusterError;
    use async_trait::async_trait;
    use std::collections::HashSet;

    /// Pod lookups backed by a set of existing pods, with optional error
    /// injection for one key.
    struct ScriptedPods {
        existing: HashSet<(String, String)>,
        fail_lookup_of: Option<(String, String)>,
    }

    impl ScriptedPods {
        fn with_existing(pods: &[(&str, &str)]) -> Self {
            Self {
                existing: pods
                    .iter()
                    .map(|(ns, name)| (ns.to_string(), name.to_string()))
                    .collect(),
                fail_lookup_of: None,
            }
        }
    }

    #[async_trait]
    impl ClusterQuery for ScriptedPods {
        async fn list_warning_events(
            &self,
            _: &str,
        ) -> ClusterResult<Vec<crate::client::WarningEvent>> {
            unreachable!("reconcile phase never lists events")
        }

        async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<()> {
            let key = (namespace.to_string(), name.to_string());
            if self.fail_lookup_of.as_ref() == Some(&key) {
                return Err(ClusterError::Api("etcdserver: request timed out".into()));
            }
            if self.existing.contains(&key) {
                Ok(())
            } else {
                Err(ClusterError::NotFound {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            }
        }
    }

    fn registry_of(keys: &[(&str, &str)]) -> SuspectRegistry {
        let mut registry = SuspectRegistry::new();
        for (ns, name) in keys {
            registry.insert(PodKey::new(*ns, *name), format!("bad pod {ns}/{name}"));
        }
        registry
    }

    #[tokio::test]
    async fn test_existing_suspects_are_kept() {
        let client = ScriptedPods::with_existing(&[("ns1", "p1")]);
        let mut suspects = registry_of(&[("ns1", "p1")]);

        reconcile(&client, &mut suspects).await.unwrap();

        assert!(suspects.contains(&PodKey::new("ns1", "p1")));
    }

    #[tokio::test]
    async fn test_missing_suspects_are_removed() {
        let client = ScriptedPods::with_existing(&[("ns1", "p1")]);
        let mut suspects = registry_of(&[("ns1", "p1"), ("ns1", "gone"), ("ns2", "gone")]);

        reconcile(&client, &mut suspects).await.unwrap();

        assert_eq!(suspects.len(), 1);
        assert!(suspects.contains(&PodKey::new("ns1", "p1")));
    }

    #[tokio::test]
    async fn test_reconcile_never_adds_keys() {
        let client = ScriptedPods::with_existing(&[("ns1", "p1"), ("ns1", "p2")]);
        let mut suspects = registry_of(&[("ns1", "p1")]);
        let before = suspects.len();

        reconcile(&client, &mut suspects).await.unwrap();

        assert!(suspects.len() <= before);
    }

    #[tokio::test]
    async fn test_other_lookup_error_aborts() {
        let mut client = ScriptedPods::with_existing(&[("ns1", "p1")]);
        client.fail_lookup_of = Some(("ns1".into(), "p1".into()));
        let mut suspects = registry_of(&[("ns1", "p1")]);

        let err = reconcile(&client, &mut suspects)
            .await
            .expect_err("expected the lookup failure to propagate");

        assert!(err.to_string().contains("request timed out"));
        // The suspect stays; it is not silently dropped on error.
        assert!(suspects.contains(&PodKey::new("ns1", "p1")));
    }
}
