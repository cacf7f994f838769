//! The `explain` use case: remediation guidance for a rule id.

use rsrguard_types::explain::{all_explained_ids, lookup_explanation, Explanation};

pub enum ExplainOutput {
    Found(Explanation),
    NotFound {
        identifier: String,
        available_ids: Vec<&'static str>,
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    match lookup_explanation(identifier) {
        Some(explanation) => ExplainOutput::Found(explanation),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_ids: all_explained_ids().to_vec(),
        },
    }
}

pub fn format_explanation(exp: &Explanation) -> String {
    format!(
        "{}\n{}\n\n{}\n\nRemediation:\n{}\n\nBefore:\n{}\n\nAfter:\n{}\n",
        exp.title,
        "=".repeat(exp.title.len()),
        exp.description,
        exp.remediation,
        exp.examples.before,
        exp.examples.after
    )
}

pub fn format_not_found(identifier: &str, available_ids: &[&str]) -> String {
    let mut out = format!("no explanation found for '{identifier}'\n\nKnown rule ids:\n");
    for id in available_ids {
        out.push_str(&format!("  {id}\n"));
    }
    out.push_str("  lang.banned.<tag>\n  pkg.banned.<tag>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_known_rule() {
        match run_explain("files.readme") {
            ExplainOutput::Found(exp) => {
                let text = format_explanation(&exp);
                assert!(text.contains("README"));
                assert!(text.contains("Remediation:"));
            }
            ExplainOutput::NotFound { .. } => panic!("files.readme should resolve"),
        }
    }

    #[test]
    fn explain_unknown_rule_lists_alternatives() {
        match run_explain("files.does_not_exist") {
            ExplainOutput::Found(_) => panic!("should not resolve"),
            ExplainOutput::NotFound {
                identifier,
                available_ids,
            } => {
                let text = format_not_found(&identifier, &available_ids);
                assert!(text.contains("files.does_not_exist"));
                assert!(text.contains("files.readme"));
            }
        }
    }
}
