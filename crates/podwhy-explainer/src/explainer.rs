use crate::affinity::anti_affinity_hosts;
use crate::filter::{default_filters, FilterPredicate};
use crate::types::{PredicateContext, PredicateResult};
use podwhy_core::{ClusterSnapshot, NodeView, ResourceQuantities};
use tracing::{debug, info};

/// Explains, node by node, why a pod cannot be placed.
///
/// Pure over the snapshot: no I/O and no state carried between runs, so the
/// same snapshot always yields the same ordered reason lists.
pub struct Explainer {
    filters: Vec<Box<dyn FilterPredicate>>,
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Explainer {
    /// Create an explainer with the default predicates
    pub fn new() -> Self {
        Self {
            filters: default_filters(),
        }
    }

    /// Evaluate every node of the snapshot, in node order
    pub fn explain(&self, snapshot: &ClusterSnapshot) -> Vec<PredicateResult> {
        let pod = &snapshot.pod;

        let context = PredicateContext {
            pod,
            requests: ResourceQuantities::sum(&pod.container_requests),
            anti_affinity_hosts: anti_affinity_hosts(pod, &snapshot.namespace_pods),
        };

        debug!(
            "Pod {} requests CPU: {} cores, Memory: {} bytes; anti-affinity excludes {:?}",
            pod.name,
            context.requests.cpu_cores,
            context.requests.memory_bytes,
            context.anti_affinity_hosts
        );

        let results: Vec<PredicateResult> = snapshot
            .nodes
            .iter()
            .map(|node| self.explain_node(&context, node))
            .collect();

        info!(
            "Pod {}/{}: {} of {} nodes schedulable",
            pod.namespace,
            pod.name,
            results.iter().filter(|r| r.is_schedulable()).count(),
            results.len()
        );

        results
    }

    /// Run every predicate against one node without short-circuiting
    fn explain_node(&self, context: &PredicateContext<'_>, node: &NodeView) -> PredicateResult {
        let mut reasons = Vec::new();

        for filter in &self.filters {
            let failed = filter.filter(context, node);
            if !failed.is_empty() {
                debug!(
                    "Node {} failed {}: {}",
                    node.name,
                    filter.name(),
                    failed
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            reasons.extend(failed);
        }

        PredicateResult::new(node.name.clone(), reasons)
    }
}
