use crate::{RenderableReport, RenderableSeverity};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for v in &report.violations {
        let level = match v.severity {
            RenderableSeverity::Critical | RenderableSeverity::High => "error",
            RenderableSeverity::Medium => "warning",
            RenderableSeverity::Low => "notice",
        };

        let message = format!("[{}] {}", v.rule_id, v.message)
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");

        match &v.path {
            Some(path) => out.push(format!("::{} file={}::{}", level, path, message)),
            None => out.push(format!("::{}::{}", level, message)),
        }
    }

    out
}
