//! Podwhy Explainer - Per-node scheduling predicate evaluation
//!
//! This crate provides:
//! - Filter predicates (node selector, readiness, node affinity, pod
//!   affinity and anti-affinity, taints, resource fit)
//! - The explainer that runs every predicate on every node and collects
//!   reason codes

pub mod affinity;
pub mod explainer;
pub mod filter;
pub mod selector;
pub mod taints;
pub mod types;

// Re-export commonly used types
pub use explainer::Explainer;
pub use filter::FilterPredicate;
pub use types::{PredicateContext, PredicateResult, Reason};
