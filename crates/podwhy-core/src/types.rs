use std::collections::BTreeMap;
use std::fmt;

/// The only topology key pod (anti-)affinity evaluation understands
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";

/// Label map with deterministic iteration order
pub type Labels = BTreeMap<String, String>;

/// Effect of a node taint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
    /// Effect string this tool does not know; it never blocks placement
    Other(String),
}

impl TaintEffect {
    pub fn parse(s: &str) -> Self {
        match s {
            "NoSchedule" => Self::NoSchedule,
            "PreferNoSchedule" => Self::PreferNoSchedule,
            "NoExecute" => Self::NoExecute,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSchedule => "NoSchedule",
            Self::PreferNoSchedule => "PreferNoSchedule",
            Self::NoExecute => "NoExecute",
            Self::Other(s) => s,
        }
    }

    /// Whether an untolerated taint with this effect keeps pods off the node
    pub fn blocks_scheduling(&self) -> bool {
        matches!(self, Self::NoSchedule | Self::NoExecute)
    }
}

impl fmt::Display for TaintEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node-side exclusion marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taint {
    pub key: String,
    /// Absent values are stored as the empty string
    pub value: String,
    pub effect: TaintEffect,
}

impl Taint {
    pub fn new(key: impl Into<String>, value: impl Into<String>, effect: TaintEffect) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            effect,
        }
    }
}

/// Toleration operator; `Equal` when the field is omitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TolerationOperator {
    #[default]
    Equal,
    Exists,
    Unknown(String),
}

impl TolerationOperator {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            None | Some("Equal") => Self::Equal,
            Some("Exists") => Self::Exists,
            Some(other) => Self::Unknown(other.to_string()),
        }
    }
}

/// A pod-side declaration that neutralizes matching taints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toleration {
    pub key: Option<String>,
    pub value: Option<String>,
    pub operator: TolerationOperator,
    /// `None` tolerates every effect
    pub effect: Option<TaintEffect>,
}

/// Operator of a single match expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    /// Anything else (`Gt`, `Lt`, typos); never matches
    Unknown(String),
}

impl SelectorOperator {
    pub fn parse(s: &str) -> Self {
        match s {
            "In" => Self::In,
            "NotIn" => Self::NotIn,
            "Exists" => Self::Exists,
            "DoesNotExist" => Self::DoesNotExist,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// One `key <operator> values` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRequirement {
    pub key: String,
    pub operator: SelectorOperator,
    pub values: Vec<String>,
}

impl SelectorRequirement {
    pub fn new(key: impl Into<String>, operator: SelectorOperator, values: &[&str]) -> Self {
        Self {
            key: key.into(),
            operator,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// matchLabels AND matchExpressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelectorTerm {
    pub match_labels: Labels,
    pub match_expressions: Vec<SelectorRequirement>,
}

/// Required node affinity: satisfied when any term matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAffinityRequirement {
    pub terms: Vec<LabelSelectorTerm>,
}

/// Required pod affinity or anti-affinity term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodAffinityTerm {
    pub label_selector: Option<LabelSelectorTerm>,
    pub topology_key: String,
}

impl PodAffinityTerm {
    pub fn is_hostname_scoped(&self) -> bool {
        self.topology_key == HOSTNAME_TOPOLOGY_KEY
    }
}

/// Anti-affinity terms share the affinity term shape
pub type PodAntiAffinityTerm = PodAffinityTerm;

/// Required scheduling constraints of a pod
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Affinity {
    /// `None` means no required node affinity at all
    pub node_affinity: Option<NodeAffinityRequirement>,
    pub pod_affinity: Vec<PodAffinityTerm>,
    pub pod_anti_affinity: Vec<PodAntiAffinityTerm>,
}

/// Everything the predicates need to know about a pod
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodView {
    pub name: String,
    pub namespace: String,
    pub uid: Option<String>,
    pub labels: Labels,
    /// Node the pod is bound to, if any
    pub node_name: Option<String>,
    /// Raw resource requests, one map per container
    pub container_requests: Vec<BTreeMap<String, String>>,
    pub node_selector: Labels,
    pub tolerations: Vec<Toleration>,
    pub affinity: Affinity,
}

impl PodView {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Identity comparison: uid when both sides carry one, name otherwise
    pub fn is_same_pod(&self, other: &PodView) -> bool {
        match (&self.uid, &other.uid) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name && self.namespace == other.namespace,
        }
    }
}

/// Everything the predicates need to know about a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeView {
    pub name: String,
    pub labels: Labels,
    pub taints: Vec<Taint>,
    /// Raw allocatable quantities
    pub allocatable: BTreeMap<String, String>,
    /// Status of the `Ready` condition, if the node reports one
    pub ready_status: Option<String>,
}

impl NodeView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_status.as_deref() == Some("True")
    }
}

/// Point-in-time input of one explainer run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSnapshot {
    /// The pod that failed to schedule
    pub pod: PodView,
    pub nodes: Vec<NodeView>,
    /// All pods of the subject pod's namespace, the subject included
    pub namespace_pods: Vec<PodView>,
}

impl ClusterSnapshot {
    pub fn new(pod: PodView, nodes: Vec<NodeView>, namespace_pods: Vec<PodView>) -> Self {
        Self {
            pod,
            nodes,
            namespace_pods,
        }
    }
}
