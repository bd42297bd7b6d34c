use crate::error::{ClientError, Result};
use crate::traits::ClusterDataProvider;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams};
use kube::{Client, Config};
use podwhy_core::{NodeView, PodView};
use tracing::{debug, warn};

/// Read-only client for the core/v1 API
///
/// Built from an explicit `kube::Config` (usually loaded from a kubeconfig);
/// there is no process-wide client configuration.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self> {
        if config.accept_invalid_certs {
            warn!("TLS verification disabled for {}", config.cluster_url);
        }

        let client = Client::try_from(config).map_err(|e| {
            ClientError::invalid_config(
                format!("Failed to build Kubernetes client: {}", e),
                "Check the TLS and credential settings of the selected context",
            )
        })?;

        Ok(Self { client })
    }
}

/// Map a failed API call onto the client error taxonomy
fn map_kube_error(resource: &str, err: kube::Error) -> ClientError {
    match err {
        kube::Error::Api(response) if response.code == 401 || response.code == 403 => {
            ClientError::AuthenticationFailed {
                resource: resource.to_string(),
                status: response.code,
            }
        }
        kube::Error::Api(response) => ClientError::ApiError {
            resource: resource.to_string(),
            status: response.code,
            message: response.message,
        },
        other => ClientError::request_failed(resource, other.to_string()),
    }
}

#[async_trait]
impl ClusterDataProvider for ApiClient {
    /// GET /api/v1/namespaces/{namespace}/pods/{name}
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodView> {
        let resource = format!("pod {}/{}", namespace, name);
        debug!("GET {}", resource);

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = pods
            .get_opt(name)
            .await
            .map_err(|e| map_kube_error(&resource, e))?
            .ok_or_else(|| ClientError::pod_not_found(namespace, name))?;
        Ok(PodView::try_from(&pod)?)
    }

    /// GET /api/v1/nodes
    async fn list_nodes(&self) -> Result<Vec<NodeView>> {
        debug!("LIST nodes");

        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error("nodes", e))?;
        debug!("Fetched {} nodes", list.items.len());
        list.items
            .iter()
            .map(|n| NodeView::try_from(n).map_err(ClientError::from))
            .collect()
    }

    /// GET /api/v1/namespaces/{namespace}/pods
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodView>> {
        let resource = format!("pods in namespace {}", namespace);
        debug!("LIST {}", resource);

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(&resource, e))?;
        debug!("Fetched {} pods in namespace {}", list.items.len(), namespace);
        list.items
            .iter()
            .map(|p| PodView::try_from(p).map_err(ClientError::from))
            .collect()
    }
}
