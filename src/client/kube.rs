//! Kubernetes-backed cluster queries.
//!
//! # Responsibilities
//! - List warning events via the events API (field selector `type=Warning`)
//! - Point pod lookups for reconciliation
//! - Classify not-found responses apart from fatal API errors

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Event, Pod};
use kube::api::ListParams;
use kube::{Api, Client};

use crate::client::{ClusterError, ClusterQuery, ClusterResult, WarningEvent};

/// Cluster access over the standard Kubernetes client. Connection
/// parameters are inferred from the environment (in-cluster service
/// account or `KUBECONFIG`).
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Create a client from the inferred environment configuration.
    pub async fn try_default() -> ClusterResult<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| ClusterError::Api(e.to_string()))?;
        Ok(Self { client })
    }

    fn events_api(&self, namespace: &str) -> Api<Event> {
        if namespace.is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace)
        }
    }
}

#[async_trait]
impl ClusterQuery for KubeCluster {
    async fn list_warning_events(&self, namespace: &str) -> ClusterResult<Vec<WarningEvent>> {
        let params = ListParams::default().fields("type=Warning");
        let events = self
            .events_api(namespace)
            .list(&params)
            .await
            .map_err(|e| ClusterError::Api(e.to_string()))?;

        Ok(events.items.into_iter().filter_map(flatten_event).collect())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<()> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        match pods.get(name).await {
            Ok(_) => Ok(()),
            Err(err) => Err(classify_get_error(err, namespace, name)),
        }
    }
}

/// Flatten a raw event to the fields the scanner qualifies on. Events
/// missing any of those fields can never qualify and are dropped here.
fn flatten_event(event: Event) -> Option<WarningEvent> {
    let involved = event.involved_object;
    let namespace = involved.namespace.or(event.metadata.namespace)?;
    Some(WarningEvent {
        kind: involved.kind?,
        namespace,
        name: involved.name?,
        reason: event.reason?,
        count: event.count?,
    })
}

/// Map a pod lookup error to the check's taxonomy. A structured 404 is the
/// primary not-found classification; the substring match is a fallback for
/// backends that surface not-found through less-structured responses.
/// TODO: drop the substring fallback once every supported backend returns
/// structured 404s through the client.
fn classify_get_error(err: kube::Error, namespace: &str, name: &str) -> ClusterError {
    let not_found = match &err {
        kube::Error::Api(response) => response.code == 404,
        other => other.to_string().contains("not found"),
    };

    if not_found {
        ClusterError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    } else {
        ClusterError::Api(err.to_string())
    }
}
