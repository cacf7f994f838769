use crate::{RenderableReport, RenderableSeverity};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# RSR compliance report\n\n");
    let verdict = if report.pass { "PASS" } else { "FAIL" };
    out.push_str(&format!(
        "- Repository: `{}`\n- Verdict: **{}**\n- Violations: {} (emitted) / {} (total)\n\n",
        report.data.repository_id,
        verdict,
        report.data.violations_emitted,
        report.data.violations_total
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let sev = match v.severity {
            RenderableSeverity::Critical => "CRITICAL",
            RenderableSeverity::High => "HIGH",
            RenderableSeverity::Medium => "MEDIUM",
            RenderableSeverity::Low => "LOW",
        };

        if let Some(path) = &v.path {
            out.push_str(&format!(
                "- [{}] `{}` — {} (`{}`)\n",
                sev, v.rule_id, v.message, path
            ));
        } else {
            out.push_str(&format!("- [{}] `{}` — {}\n", sev, v.rule_id, v.message));
        }

        if let Some(fix) = &v.remediation {
            out.push_str(&format!("  - fix: {}\n", fix));
        }
    }

    out
}
