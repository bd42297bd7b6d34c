//! Podwhy Core - Snapshot types for explaining pod placement failures
//!
//! This crate provides:
//! - Typed, immutable pod and node views built once per snapshot
//! - Conversion from k8s-openapi objects into those views
//! - Resource quantity parsing
//! - Error types with miette diagnostics
//! - Serialization helpers

pub mod convert;
pub mod error;
pub mod resources;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use resources::{parse_quantity, ResourceQuantities};
pub use types::{
    Affinity, ClusterSnapshot, LabelSelectorTerm, Labels, NodeAffinityRequirement, NodeView,
    PodAffinityTerm, PodAntiAffinityTerm, PodView, SelectorOperator, SelectorRequirement, Taint,
    TaintEffect, Toleration, TolerationOperator, HOSTNAME_TOPOLOGY_KEY,
};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::{Node, Pod};

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        CoreError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from JSON
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| {
        CoreError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from YAML
pub fn from_yaml<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_yaml::from_str(data).map_err(|e| {
        CoreError::serialization_error(
            format!("Failed to deserialize from YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_serialization() {
        let mut pod = Pod::default();
        pod.metadata.name = Some("nginx".to_string());

        let json = to_json_pretty(&pod).unwrap();
        assert!(json.contains("nginx"));

        let deserialized: Pod = from_json(&json).unwrap();
        assert_eq!(deserialized.metadata.name, Some("nginx".to_string()));
    }

    #[test]
    fn test_yaml_deserialization() {
        let deserialized: Node = from_yaml("metadata:\n  name: worker-1\n").unwrap();
        assert_eq!(deserialized.metadata.name, Some("worker-1".to_string()));
    }

    #[test]
    fn test_bad_yaml_is_serialization_error() {
        let err = from_yaml::<Node>("metadata: [").unwrap_err();
        assert!(matches!(err, CoreError::SerializationError { .. }));
    }
}
