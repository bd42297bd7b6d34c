use crate::error::{ClientError, Result};
use crate::traits::ClusterDataProvider;
use async_trait::async_trait;
use podwhy_core::{NodeView, PodView};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// In-memory provider for tests
///
/// Serves a fixed set of pods and nodes. Listing can be made to fail to
/// exercise the fatal fetch paths, and every call is counted.
#[derive(Default)]
pub struct InMemoryProvider {
    pods: Vec<PodView>,
    nodes: Vec<NodeView>,
    fail_node_list: bool,
    fail_pod_list: bool,
    calls: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new(pods: Vec<PodView>, nodes: Vec<NodeView>) -> Self {
        Self {
            pods,
            nodes,
            ..Default::default()
        }
    }

    /// Make `list_nodes` fail
    pub fn failing_node_list(mut self) -> Self {
        self.fail_node_list = true;
        self
    }

    /// Make `list_pods` fail
    pub fn failing_pod_list(mut self) -> Self {
        self.fail_pod_list = true;
        self
    }

    /// Number of provider calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterDataProvider for InMemoryProvider {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodView> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pods
            .iter()
            .find(|p| p.namespace == namespace && p.name == name)
            .cloned()
            .ok_or_else(|| ClientError::pod_not_found(namespace, name))
    }

    async fn list_nodes(&self) -> Result<Vec<NodeView>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_node_list {
            return Err(ClientError::request_failed("nodes", "node list unavailable"));
        }
        debug!("Mock: listing {} nodes", self.nodes.len());
        Ok(self.nodes.clone())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodView>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_pod_list {
            return Err(ClientError::request_failed("pods", "pod list unavailable"));
        }
        Ok(self
            .pods
            .iter()
            .filter(|p| p.namespace == namespace)
            .cloned()
            .collect())
    }
}
