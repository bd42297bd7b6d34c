use crate::error::{ClientError, Result};
use crate::traits::ClusterDataProvider;
use podwhy_core::ClusterSnapshot;
use std::time::Duration;
use tracing::{info, warn};

/// Fetch everything one explanation needs, as a single step.
///
/// The subject pod is fetched first so a missing pod fails fast. The node
/// list is always fetched; the namespace pod list only when the pod carries a
/// hostname-scoped anti-affinity term. A failed node list is fatal, a failed
/// pod list leaves the anti-affinity host set empty. There are no retries and
/// the whole step is bounded by `deadline`.
pub async fn capture_snapshot(
    provider: &dyn ClusterDataProvider,
    namespace: &str,
    pod_name: &str,
    deadline: Duration,
) -> Result<ClusterSnapshot> {
    let fetch = async {
        let pod = provider.get_pod(namespace, pod_name).await?;

        let needs_pods = pod
            .affinity
            .pod_anti_affinity
            .iter()
            .any(|term| term.is_hostname_scoped());
        if !needs_pods {
            let nodes = provider.list_nodes().await?;
            return Ok(ClusterSnapshot::new(pod, nodes, Vec::new()));
        }

        let (nodes, namespace_pods) =
            tokio::join!(provider.list_nodes(), provider.list_pods(namespace));
        let namespace_pods = namespace_pods.unwrap_or_else(|e| {
            warn!(
                "Listing pods in {} failed, anti-affinity excludes no nodes: {}",
                namespace, e
            );
            Vec::new()
        });
        Ok::<_, ClientError>(ClusterSnapshot::new(pod, nodes?, namespace_pods))
    };

    let snapshot = tokio::time::timeout(deadline, fetch)
        .await
        .map_err(|_| ClientError::Timeout {
            seconds: deadline.as_secs(),
        })??;

    info!(
        "Captured snapshot for {}/{}: {} nodes, {} pods in namespace",
        namespace,
        pod_name,
        snapshot.nodes.len(),
        snapshot.namespace_pods.len()
    );

    Ok(snapshot)
}
