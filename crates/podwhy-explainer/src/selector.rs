//! Label selector matching shared by node affinity and pod anti-affinity.

use podwhy_core::{LabelSelectorTerm, Labels, SelectorOperator, SelectorRequirement};

/// Evaluate a single expression against a label set
pub fn requirement_matches(req: &SelectorRequirement, labels: &Labels) -> bool {
    let value = labels.get(&req.key);
    match &req.operator {
        SelectorOperator::In => value.is_some_and(|v| req.values.contains(v)),
        SelectorOperator::NotIn => value.is_none_or(|v| !req.values.contains(v)),
        SelectorOperator::Exists => value.is_some(),
        SelectorOperator::DoesNotExist => value.is_none(),
        SelectorOperator::Unknown(_) => false,
    }
}

/// A term matches when every matchLabels pair and every expression holds.
/// An empty term matches everything.
pub fn term_matches(term: &LabelSelectorTerm, labels: &Labels) -> bool {
    term.match_labels
        .iter()
        .all(|(k, v)| labels.get(k) == Some(v))
        && term
            .match_expressions
            .iter()
            .all(|req| requirement_matches(req, labels))
}
