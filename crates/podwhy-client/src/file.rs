use crate::error::{ClientError, Result};
use crate::traits::ClusterDataProvider;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use podwhy_core::{from_yaml, CoreError, NodeView, PodView};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Offline provider reading pods and nodes from a captured document.
///
/// Accepts a YAML or JSON `List` whose `items` are Pods and Nodes, such as
/// the output of `kubectl get pods,nodes -o yaml`. Items of other kinds are
/// skipped.
#[derive(Debug, Default)]
pub struct FileProvider {
    pods: Vec<PodView>,
    nodes: Vec<NodeView>,
}

#[derive(Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

impl FileProvider {
    /// Parse a snapshot document
    pub fn parse(content: &str) -> Result<Self> {
        let doc: SnapshotDocument = from_yaml(content)?;
        let mut provider = Self::default();

        for item in doc.items {
            match item["kind"].as_str() {
                Some("Pod") => {
                    let pod: Pod = serde_json::from_value(item).map_err(|e| {
                        CoreError::serialization_error(
                            format!("Invalid Pod in snapshot: {}", e),
                            Some(Box::new(e)),
                        )
                    })?;
                    provider.pods.push(PodView::try_from(&pod)?);
                }
                Some("Node") => {
                    let node: Node = serde_json::from_value(item).map_err(|e| {
                        CoreError::serialization_error(
                            format!("Invalid Node in snapshot: {}", e),
                            Some(Box::new(e)),
                        )
                    })?;
                    provider.nodes.push(NodeView::try_from(&node)?);
                }
                other => warn!("Skipping snapshot item of kind {:?}", other),
            }
        }

        debug!(
            "Loaded snapshot with {} pods and {} nodes",
            provider.pods.len(),
            provider.nodes.len()
        );
        Ok(provider)
    }

    /// Read and parse a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ClientError::SnapshotFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

#[async_trait]
impl ClusterDataProvider for FileProvider {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodView> {
        self.pods
            .iter()
            .find(|p| p.namespace == namespace && p.name == name)
            .cloned()
            .ok_or_else(|| ClientError::pod_not_found(namespace, name))
    }

    async fn list_nodes(&self) -> Result<Vec<NodeView>> {
        Ok(self.nodes.clone())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodView>> {
        Ok(self
            .pods
            .iter()
            .filter(|p| p.namespace == namespace)
            .cloned()
            .collect())
    }
}
