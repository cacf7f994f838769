//! Render-facing report model, decoupled from the wire types so renderers
//! stay stable across report schema revisions.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl RenderableSeverity {
    pub fn label(self) -> &'static str {
        match self {
            RenderableSeverity::Critical => "CRITICAL",
            RenderableSeverity::High => "HIGH",
            RenderableSeverity::Medium => "MEDIUM",
            RenderableSeverity::Low => "LOW",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub severity: RenderableSeverity,
    pub rule_id: String,
    pub message: String,
    pub path: Option<String>,
    pub remediation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub repository_id: String,
    pub files_scanned: u32,
    pub rules_evaluated: u32,
    pub violations_total: u32,
    pub violations_emitted: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub pass: bool,
    pub violations: Vec<RenderableViolation>,
    pub data: RenderableData,
}
