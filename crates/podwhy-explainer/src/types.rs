use podwhy_core::{PodView, ResourceQuantities};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Why a node cannot host the pod
///
/// The `Display` form is the stable reason code printed to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    NodeSelectorMismatch { key: String, value: String },
    NodeNotReady,
    NodeAffinityMismatch,
    PodAffinityMismatch,
    PodAntiAffinityMismatch,
    UntoleratedTaint { key: String, value: String },
    InsufficientCPU,
    InsufficientMemory,
    /// Sentinel for a node that triggered no other reason
    Schedulable,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeSelectorMismatch { key, value } => {
                write!(f, "NodeSelectorMismatch({}={})", key, value)
            }
            Self::NodeNotReady => f.write_str("NodeNotReady"),
            Self::NodeAffinityMismatch => f.write_str("NodeAffinityMismatch"),
            Self::PodAffinityMismatch => f.write_str("PodAffinityMismatch"),
            Self::PodAntiAffinityMismatch => f.write_str("PodAntiAffinityMismatch"),
            Self::UntoleratedTaint { key, value } => {
                write!(f, "UntoleratedTaint({}={})", key, value)
            }
            Self::InsufficientCPU => f.write_str("InsufficientCPU"),
            Self::InsufficientMemory => f.write_str("InsufficientMemory"),
            Self::Schedulable => f.write_str("Schedulable"),
        }
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-node outcome of an explainer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateResult {
    /// Node name
    #[serde(rename = "node")]
    pub node_name: String,
    /// Failed predicates in evaluation order, or exactly `[Schedulable]`
    pub reasons: Vec<Reason>,
}

impl PredicateResult {
    /// Build a result, collapsing an empty reason list into `[Schedulable]`
    pub fn new(node_name: String, reasons: Vec<Reason>) -> Self {
        let reasons = if reasons.is_empty() {
            vec![Reason::Schedulable]
        } else {
            reasons
        };
        Self { node_name, reasons }
    }

    pub fn is_schedulable(&self) -> bool {
        self.reasons == [Reason::Schedulable]
    }
}

/// Node-independent facts computed once per run
#[derive(Debug, Clone)]
pub struct PredicateContext<'a> {
    /// Pod being explained
    pub pod: &'a PodView,
    /// Sum of the pod's container requests
    pub requests: ResourceQuantities,
    /// Nodes hosting a pod that the pod's anti-affinity rules exclude
    pub anti_affinity_hosts: BTreeSet<String>,
}
