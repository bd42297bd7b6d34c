use crate::error::Result;
use async_trait::async_trait;
use podwhy_core::{NodeView, PodView};

/// Read-only source of the cluster objects an explanation needs
///
/// Implementations fetch once per call and return already-converted views;
/// the explainer never sees the transport. `ApiClient` talks to a live API
/// server, `FileProvider` reads a captured snapshot and `InMemoryProvider`
/// backs tests.
#[async_trait]
pub trait ClusterDataProvider: Send + Sync {
    /// Fetch one pod; `ClientError::PodNotFound` if it does not exist
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodView>;

    /// List every node of the cluster
    async fn list_nodes(&self) -> Result<Vec<NodeView>>;

    /// List every pod of a namespace
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodView>>;
}
