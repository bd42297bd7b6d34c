use crate::affinity::{node_affinity_satisfied, pod_affinity_satisfied};
use crate::taints::is_blocking;
use crate::types::{PredicateContext, Reason};
use podwhy_core::{NodeView, ResourceQuantities};
use tracing::debug;

/// A single scheduling constraint evaluated against one node
pub trait FilterPredicate: Send + Sync {
    /// Reasons this node fails the predicate; empty when it passes
    fn filter(&self, context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason>;

    /// Name of the filter
    fn name(&self) -> &str;
}

/// Filter for the pod's flat node selector
pub struct NodeSelectorMatch;

impl FilterPredicate for NodeSelectorMatch {
    fn filter(&self, context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason> {
        // Every mismatching pair is reported, in key order
        context
            .pod
            .node_selector
            .iter()
            .filter(|(key, value)| node.labels.get(*key) != Some(*value))
            .map(|(key, value)| Reason::NodeSelectorMismatch {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    fn name(&self) -> &str {
        "NodeSelectorMatch"
    }
}

/// Filter for the node Ready condition
pub struct NodeReady;

impl FilterPredicate for NodeReady {
    fn filter(&self, _context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason> {
        if node.is_ready() {
            Vec::new()
        } else {
            vec![Reason::NodeNotReady]
        }
    }

    fn name(&self) -> &str {
        "NodeReady"
    }
}

/// Filter for required node affinity
pub struct NodeAffinityMatch;

impl FilterPredicate for NodeAffinityMatch {
    fn filter(&self, context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason> {
        let requirement = context.pod.affinity.node_affinity.as_ref();
        if node_affinity_satisfied(requirement, &node.labels) {
            Vec::new()
        } else {
            vec![Reason::NodeAffinityMismatch]
        }
    }

    fn name(&self) -> &str {
        "NodeAffinityMatch"
    }
}

/// Filter for required pod affinity
pub struct PodAffinityMatch;

impl FilterPredicate for PodAffinityMatch {
    fn filter(&self, context: &PredicateContext<'_>, _node: &NodeView) -> Vec<Reason> {
        if pod_affinity_satisfied(context.pod) {
            Vec::new()
        } else {
            vec![Reason::PodAffinityMismatch]
        }
    }

    fn name(&self) -> &str {
        "PodAffinityMatch"
    }
}

/// Filter for required pod anti-affinity, against the precomputed host set
pub struct PodAntiAffinityMatch;

impl FilterPredicate for PodAntiAffinityMatch {
    fn filter(&self, context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason> {
        if context.anti_affinity_hosts.contains(&node.name) {
            vec![Reason::PodAntiAffinityMismatch]
        } else {
            Vec::new()
        }
    }

    fn name(&self) -> &str {
        "PodAntiAffinityMatch"
    }
}

/// Filter for taints and tolerations; one reason per blocking taint
pub struct TaintToleration;

impl FilterPredicate for TaintToleration {
    fn filter(&self, context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason> {
        node.taints
            .iter()
            .filter(|taint| is_blocking(taint, &context.pod.tolerations))
            .map(|taint| Reason::UntoleratedTaint {
                key: taint.key.clone(),
                value: taint.value.clone(),
            })
            .collect()
    }

    fn name(&self) -> &str {
        "TaintToleration"
    }
}

/// Filter for pod resource requests against node allocatable.
///
/// Compares with the raw allocatable amounts: requests of pods already
/// running on the node are not subtracted, so a node reported as fitting may
/// still be full in the live cluster.
pub struct PodFitsResources;

impl FilterPredicate for PodFitsResources {
    fn filter(&self, context: &PredicateContext<'_>, node: &NodeView) -> Vec<Reason> {
        let allocatable = ResourceQuantities::from_resource_map(&node.allocatable);
        let requests = &context.requests;

        debug!(
            "Node {} has CPU: {} cores, Memory: {} bytes",
            node.name, allocatable.cpu_cores, allocatable.memory_bytes
        );

        let mut reasons = Vec::new();
        if requests.cpu_cores > allocatable.cpu_cores {
            reasons.push(Reason::InsufficientCPU);
        }
        if requests.memory_bytes > allocatable.memory_bytes {
            reasons.push(Reason::InsufficientMemory);
        }
        reasons
    }

    fn name(&self) -> &str {
        "PodFitsResources"
    }
}

/// Get the default filter predicates, in report order
pub fn default_filters() -> Vec<Box<dyn FilterPredicate>> {
    vec![
        Box::new(NodeSelectorMatch),
        Box::new(NodeReady),
        Box::new(NodeAffinityMatch),
        Box::new(PodAffinityMatch),
        Box::new(PodAntiAffinityMatch),
        Box::new(TaintToleration),
        Box::new(PodFitsResources),
    ]
}
