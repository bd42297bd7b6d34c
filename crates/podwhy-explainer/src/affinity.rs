//! Node affinity, pod affinity and pod anti-affinity evaluation.

use crate::selector::term_matches;
use podwhy_core::{Labels, NodeAffinityRequirement, PodView};
use std::collections::BTreeSet;
use tracing::debug;

/// Required node affinity holds when any of its terms matches the node labels.
/// No requirement at all is vacuously satisfied.
pub fn node_affinity_satisfied(
    requirement: Option<&NodeAffinityRequirement>,
    node_labels: &Labels,
) -> bool {
    match requirement {
        None => true,
        Some(req) => req.terms.iter().any(|term| term_matches(term, node_labels)),
    }
}

/// Hostname-scoped pod affinity, compared on the `app` label only.
///
/// A term fails when its matchLabels `app` value differs from the pod's own
/// `app` label; the result does not depend on the node. Terms without
/// matchLabels or with another topology key are ignored.
pub fn pod_affinity_satisfied(pod: &PodView) -> bool {
    let own_app = pod.labels.get("app");
    pod.affinity
        .pod_affinity
        .iter()
        .filter(|term| term.is_hostname_scoped())
        .filter_map(|term| term.label_selector.as_ref())
        .filter(|selector| !selector.match_labels.is_empty())
        .all(|selector| selector.match_labels.get("app") == own_app)
}

/// Names of nodes excluded by the pod's hostname-scoped anti-affinity terms.
///
/// Scans every other pod of the namespace once per term and collects the
/// node each matching pod is bound to. Unbound pods contribute nothing.
pub fn anti_affinity_hosts(pod: &PodView, namespace_pods: &[PodView]) -> BTreeSet<String> {
    let mut hosts = BTreeSet::new();

    for term in &pod.affinity.pod_anti_affinity {
        if !term.is_hostname_scoped() {
            debug!(
                "Ignoring anti-affinity term with topology key {}",
                term.topology_key
            );
            continue;
        }
        let Some(selector) = &term.label_selector else {
            continue;
        };

        for other in namespace_pods {
            if other.is_same_pod(pod) {
                continue;
            }
            if !term_matches(selector, &other.labels) {
                continue;
            }
            if let Some(node_name) = &other.node_name {
                debug!(
                    "Pod {} on {} matches anti-affinity of {}",
                    other.name, node_name, pod.name
                );
                hosts.insert(node_name.clone());
            }
        }
    }

    hosts
}
