//! The `explain` use case: look up rule documentation.

use edgeguard_types::explain::{self, Explanation};

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found {
        id: String,
        explanation: Explanation,
    },
    /// Unknown identifier; includes the known rule ids.
    NotFound {
        identifier: String,
        available: &'static [&'static str],
    },
}

/// Look up an explanation for a rule id (case-insensitive).
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(explanation) => ExplainOutput::Found {
            id: identifier.trim().to_ascii_uppercase(),
            explanation,
        },
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available: explain::all_rule_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(id: &str, exp: &Explanation) -> String {
    let heading = format!("{id}: {}", exp.title);
    let mut out = String::new();
    out.push_str(&heading);
    out.push('\n');
    out.push_str(&"=".repeat(heading.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push('\n');
    out
}

pub fn format_not_found(identifier: &str, available: &[&'static str]) -> String {
    let mut out = format!("Unknown rule id: {identifier}\n\nKnown rule ids:\n");
    for id in available {
        out.push_str(&format!("  - {id}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_known_rule_any_case() {
        match run_explain("res001") {
            ExplainOutput::Found { id, explanation } => {
                assert_eq!(id, "RES001");
                let text = format_explanation(&id, &explanation);
                assert!(text.starts_with("RES001: "));
                assert!(text.contains("Remediation"));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn explain_unknown_lists_rules() {
        match run_explain("NOPE999") {
            ExplainOutput::NotFound {
                identifier,
                available,
            } => {
                assert_eq!(identifier, "NOPE999");
                let text = format_not_found(&identifier, available);
                assert!(text.contains("Unknown rule id: NOPE999"));
                assert!(text.contains("  - SEC001"));
                assert!(text.contains("  - COST002"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
