//! Conversion from API objects into the typed snapshot views.
//!
//! Conversion happens once, when the snapshot is captured. Every optional
//! field that is absent collapses to its most permissive default (no labels,
//! no tolerations, no affinity).

use crate::error::{CoreError, Result};
use crate::types::{
    Affinity, LabelSelectorTerm, NodeAffinityRequirement, NodeView, PodAffinityTerm, PodView,
    SelectorOperator, SelectorRequirement, Taint, TaintEffect, Toleration, TolerationOperator,
};
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap;

fn raw_quantities(map: Option<&BTreeMap<String, Quantity>>) -> BTreeMap<String, String> {
    map.map(|m| m.iter().map(|(k, q)| (k.clone(), q.0.clone())).collect())
        .unwrap_or_default()
}

fn convert_toleration(t: &corev1::Toleration) -> Toleration {
    Toleration {
        key: t.key.clone(),
        value: t.value.clone(),
        operator: TolerationOperator::parse(t.operator.as_deref()),
        effect: t
            .effect
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(TaintEffect::parse),
    }
}

fn convert_taint(t: &corev1::Taint) -> Taint {
    Taint {
        key: t.key.clone(),
        value: t.value.clone().unwrap_or_default(),
        effect: TaintEffect::parse(&t.effect),
    }
}

fn convert_label_selector(selector: &LabelSelector) -> LabelSelectorTerm {
    LabelSelectorTerm {
        match_labels: selector.match_labels.clone().unwrap_or_default(),
        match_expressions: selector
            .match_expressions
            .iter()
            .flatten()
            .map(|e| SelectorRequirement {
                key: e.key.clone(),
                operator: SelectorOperator::parse(&e.operator),
                values: e.values.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

fn convert_node_selector_term(term: &corev1::NodeSelectorTerm) -> LabelSelectorTerm {
    // matchFields is not evaluated
    LabelSelectorTerm {
        match_labels: BTreeMap::new(),
        match_expressions: term
            .match_expressions
            .iter()
            .flatten()
            .map(|e| SelectorRequirement {
                key: e.key.clone(),
                operator: SelectorOperator::parse(&e.operator),
                values: e.values.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

fn convert_pod_affinity_terms(terms: Option<&Vec<corev1::PodAffinityTerm>>) -> Vec<PodAffinityTerm> {
    terms
        .into_iter()
        .flatten()
        .map(|t| PodAffinityTerm {
            label_selector: t.label_selector.as_ref().map(convert_label_selector),
            topology_key: t.topology_key.clone(),
        })
        .collect()
}

fn convert_affinity(affinity: Option<&corev1::Affinity>) -> Affinity {
    let Some(affinity) = affinity else {
        return Affinity::default();
    };

    let node_affinity = affinity
        .node_affinity
        .as_ref()
        .and_then(|na| na.required_during_scheduling_ignored_during_execution.as_ref())
        .map(|selector| NodeAffinityRequirement {
            terms: selector
                .node_selector_terms
                .iter()
                .map(convert_node_selector_term)
                .collect(),
        });

    let pod_affinity = convert_pod_affinity_terms(
        affinity
            .pod_affinity
            .as_ref()
            .and_then(|pa| pa.required_during_scheduling_ignored_during_execution.as_ref()),
    );

    let pod_anti_affinity = convert_pod_affinity_terms(
        affinity
            .pod_anti_affinity
            .as_ref()
            .and_then(|pa| pa.required_during_scheduling_ignored_during_execution.as_ref()),
    );

    Affinity {
        node_affinity,
        pod_affinity,
        pod_anti_affinity,
    }
}

impl TryFrom<&corev1::Pod> for PodView {
    type Error = CoreError;

    fn try_from(pod: &corev1::Pod) -> Result<Self> {
        let name = pod
            .metadata
            .name
            .clone()
            .ok_or_else(|| CoreError::invalid_object("Pod", "metadata.name is missing"))?;

        let mut view = PodView::new(name, pod.metadata.namespace.clone().unwrap_or_default());
        view.uid = pod.metadata.uid.clone();
        view.labels = pod.metadata.labels.clone().unwrap_or_default();

        if let Some(spec) = &pod.spec {
            view.node_name = spec.node_name.clone().filter(|n| !n.is_empty());
            view.container_requests = spec
                .containers
                .iter()
                .map(|c| raw_quantities(c.resources.as_ref().and_then(|r| r.requests.as_ref())))
                .collect();
            view.node_selector = spec.node_selector.clone().unwrap_or_default();
            view.tolerations = spec
                .tolerations
                .iter()
                .flatten()
                .map(convert_toleration)
                .collect();
            view.affinity = convert_affinity(spec.affinity.as_ref());
        }

        Ok(view)
    }
}

impl TryFrom<&corev1::Node> for NodeView {
    type Error = CoreError;

    fn try_from(node: &corev1::Node) -> Result<Self> {
        let name = node
            .metadata
            .name
            .clone()
            .ok_or_else(|| CoreError::invalid_object("Node", "metadata.name is missing"))?;

        let mut view = NodeView::new(name);
        view.labels = node.metadata.labels.clone().unwrap_or_default();
        view.taints = node
            .spec
            .as_ref()
            .and_then(|s| s.taints.as_ref())
            .into_iter()
            .flatten()
            .map(convert_taint)
            .collect();

        if let Some(status) = &node.status {
            view.allocatable = raw_quantities(status.allocatable.as_ref());
            view.ready_status = status
                .conditions
                .iter()
                .flatten()
                .find(|c| c.type_ == "Ready")
                .map(|c| c.status.clone());
        }

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_yaml, Node, Pod};

    const POD_YAML: &str = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web-0
  namespace: shop
  uid: "uid-1234"
  labels:
    app: web
spec:
  nodeSelector:
    disktype: ssd
  tolerations:
    - key: dedicated
      operator: Exists
      effect: NoSchedule
    - key: team
      value: payments
  affinity:
    nodeAffinity:
      requiredDuringSchedulingIgnoredDuringExecution:
        nodeSelectorTerms:
          - matchExpressions:
              - key: zone
                operator: In
                values: [a, b]
    podAntiAffinity:
      requiredDuringSchedulingIgnoredDuringExecution:
        - topologyKey: kubernetes.io/hostname
          labelSelector:
            matchLabels:
              app: web
  containers:
    - name: app
      image: nginx
      resources:
        requests:
          cpu: 250m
          memory: 64Mi
    - name: sidecar
      image: envoy
"#;

    const NODE_YAML: &str = r#"
apiVersion: v1
kind: Node
metadata:
  name: worker-1
  labels:
    zone: a
spec:
  taints:
    - key: dedicated
      value: gpu
      effect: NoSchedule
    - key: maintenance
      effect: NoExecute
status:
  allocatable:
    cpu: "4"
    memory: 8Gi
  conditions:
    - type: MemoryPressure
      status: "False"
    - type: Ready
      status: "True"
"#;

    #[test]
    fn test_pod_conversion() {
        let pod: Pod = from_yaml(POD_YAML).unwrap();
        let view = PodView::try_from(&pod).unwrap();

        assert_eq!(view.name, "web-0");
        assert_eq!(view.namespace, "shop");
        assert_eq!(view.uid.as_deref(), Some("uid-1234"));
        assert_eq!(view.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(view.node_name, None);
        assert_eq!(view.container_requests.len(), 2);
        assert_eq!(view.container_requests[0]["cpu"], "250m");
        assert!(view.container_requests[1].is_empty());
        assert_eq!(view.node_selector["disktype"], "ssd");

        assert_eq!(view.tolerations.len(), 2);
        assert_eq!(view.tolerations[0].operator, TolerationOperator::Exists);
        assert_eq!(view.tolerations[0].effect, Some(TaintEffect::NoSchedule));
        assert_eq!(view.tolerations[1].operator, TolerationOperator::Equal);
        assert_eq!(view.tolerations[1].effect, None);

        let node_affinity = view.affinity.node_affinity.as_ref().unwrap();
        assert_eq!(node_affinity.terms.len(), 1);
        assert_eq!(
            node_affinity.terms[0].match_expressions[0].operator,
            SelectorOperator::In
        );
        assert!(view.affinity.pod_affinity.is_empty());
        assert_eq!(view.affinity.pod_anti_affinity.len(), 1);
        assert!(view.affinity.pod_anti_affinity[0].is_hostname_scoped());
    }

    #[test]
    fn test_node_conversion() {
        let node: Node = from_yaml(NODE_YAML).unwrap();
        let view = NodeView::try_from(&node).unwrap();

        assert_eq!(view.name, "worker-1");
        assert_eq!(view.labels["zone"], "a");
        assert_eq!(view.taints.len(), 2);
        assert_eq!(view.taints[0], Taint::new("dedicated", "gpu", TaintEffect::NoSchedule));
        assert_eq!(view.taints[1].value, "");
        assert_eq!(view.allocatable["memory"], "8Gi");
        assert!(view.is_ready());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let pod = Pod::default();
        assert!(matches!(
            PodView::try_from(&pod),
            Err(CoreError::InvalidObject { .. })
        ));

        let node = Node::default();
        assert!(NodeView::try_from(&node).is_err());
    }

    #[test]
    fn test_bare_objects_get_permissive_defaults() {
        let mut pod = Pod::default();
        pod.metadata.name = Some("bare".to_string());
        let view = PodView::try_from(&pod).unwrap();
        assert!(view.tolerations.is_empty());
        assert!(view.node_selector.is_empty());
        assert_eq!(view.affinity, Affinity::default());

        let mut node = Node::default();
        node.metadata.name = Some("bare".to_string());
        let view = NodeView::try_from(&node).unwrap();
        assert!(view.taints.is_empty());
        assert_eq!(view.ready_status, None);
    }
}
