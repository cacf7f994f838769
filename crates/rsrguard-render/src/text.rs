use crate::{RenderableReport, RenderableSeverity};

/// Human-readable terminal report: violations grouped by severity, each with
/// rule id, path, and remediation hint.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    let verdict = if report.pass { "PASS" } else { "FAIL" };
    out.push_str(&format!(
        "{}: {} ({} violation(s), {} file(s) scanned, {} rule(s) evaluated)\n",
        report.data.repository_id,
        verdict,
        report.data.violations_emitted,
        report.data.files_scanned,
        report.data.rules_evaluated
    ));

    if let Some(reason) = &report.data.truncated_reason {
        out.push_str(&format!("note: {reason}\n"));
    }

    for severity in [
        RenderableSeverity::Critical,
        RenderableSeverity::High,
        RenderableSeverity::Medium,
        RenderableSeverity::Low,
    ] {
        let group: Vec<_> = report
            .violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }

        out.push_str(&format!("\n{}\n", severity.label()));
        for v in group {
            match &v.path {
                Some(path) => {
                    out.push_str(&format!("  [{}] {} — {}\n", v.rule_id, path, v.message))
                }
                None => out.push_str(&format!("  [{}] {}\n", v.rule_id, v.message)),
            }
            if let Some(fix) = &v.remediation {
                out.push_str(&format!("      fix: {fix}\n"));
            }
        }
    }

    out
}
