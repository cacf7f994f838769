//! Render use cases: serialize reports and produce terminal, markdown, and
//! annotation output from in-memory reports.

use anyhow::Context;
use rsrguard_render::{
    RenderableData, RenderableReport, RenderableSeverity, RenderableViolation,
};
use rsrguard_types::{ComplianceReport, Severity, SCHEMA_REPORT_V1};

pub fn serialize_report(report: &ComplianceReport) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ComplianceReport> {
    let report: ComplianceReport = serde_json::from_str(text).context("parse report json")?;
    if report.schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {}", report.schema);
    }
    Ok(report)
}

pub fn to_renderable(report: &ComplianceReport) -> RenderableReport {
    RenderableReport {
        pass: report.pass,
        violations: report
            .violations
            .iter()
            .map(|v| RenderableViolation {
                severity: match v.severity {
                    Severity::Critical => RenderableSeverity::Critical,
                    Severity::High => RenderableSeverity::High,
                    Severity::Medium => RenderableSeverity::Medium,
                    Severity::Low => RenderableSeverity::Low,
                },
                rule_id: v.rule_id.clone(),
                message: v.message.clone(),
                path: v.path.as_ref().map(|p| p.as_str().to_string()),
                remediation: v.remediation.clone(),
            })
            .collect(),
        data: RenderableData {
            repository_id: report.repository.id.clone(),
            files_scanned: report.data.files_scanned,
            rules_evaluated: report.data.rules_evaluated,
            violations_total: report.data.violations_total,
            violations_emitted: report.data.violations_emitted,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

pub fn render_text(report: &RenderableReport) -> String {
    rsrguard_render::render_text(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    rsrguard_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    rsrguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}
