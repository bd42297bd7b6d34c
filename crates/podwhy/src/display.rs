//! Rendering of explainer results.

use podwhy_explainer::{PredicateResult, Reason};
use std::fmt::Write;

/// Width of the node name column
pub const NODE_COLUMN_WIDTH: usize = 40;

fn reason_label(reason: &Reason) -> String {
    match reason {
        Reason::Schedulable => "✓ Schedulable".to_string(),
        other => other.to_string(),
    }
}

/// Render the analysis as a fixed-width table
pub fn render_table(pod_name: &str, namespace: &str, results: &[PredicateResult]) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "\nScheduling Analysis for Pod: {} (Namespace: {})\n",
        pod_name, namespace
    );
    let _ = writeln!(out, "{:<width$} REASONS", "NODE", width = NODE_COLUMN_WIDTH);
    let _ = writeln!(out, "{}", "=".repeat(80));

    for result in results {
        let reasons: Vec<String> = result.reasons.iter().map(reason_label).collect();
        let _ = writeln!(
            out,
            "{:<width$} {}",
            result.node_name,
            reasons.join(", "),
            width = NODE_COLUMN_WIDTH
        );
    }

    out
}

/// Render the analysis as a JSON array of `{node, reasons}` objects
pub fn render_json(results: &[PredicateResult]) -> podwhy_core::Result<String> {
    podwhy_core::to_json_pretty(&results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<PredicateResult> {
        vec![
            PredicateResult::new(
                "worker-1".to_string(),
                vec![
                    Reason::NodeNotReady,
                    Reason::UntoleratedTaint {
                        key: "dedicated".to_string(),
                        value: "gpu".to_string(),
                    },
                ],
            ),
            PredicateResult::new("worker-2".to_string(), Vec::new()),
        ]
    }

    #[test]
    fn test_table_layout() {
        let table = render_table("web-0", "shop", &results());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Scheduling Analysis for Pod: web-0 (Namespace: shop)");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], format!("{:<40} REASONS", "NODE"));
        assert_eq!(lines[4], "=".repeat(80));
        assert_eq!(
            lines[5],
            format!("{:<40} NodeNotReady, UntoleratedTaint(dedicated=gpu)", "worker-1")
        );
        assert_eq!(lines[6], format!("{:<40} ✓ Schedulable", "worker-2"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_long_node_names_are_not_truncated() {
        let name = "n".repeat(50);
        let table = render_table(
            "p",
            "ns",
            &[PredicateResult::new(name.clone(), vec![Reason::NodeNotReady])],
        );
        assert!(table.contains(&format!("{} NodeNotReady", name)));
    }

    #[test]
    fn test_json_output() {
        let json = render_json(&results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["node"], "worker-1");
        assert_eq!(value[0]["reasons"][1], "UntoleratedTaint(dedicated=gpu)");
        assert_eq!(value[1]["reasons"][0], "Schedulable");
    }
}
