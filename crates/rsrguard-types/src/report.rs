use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for rsrguard reports.
pub const SCHEMA_REPORT_V1: &str = "rsrguard.report.v1";

/// Violation severity. `Critical` and `High` block the `pass` verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Deterministic sort key: most severe first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    /// True if this severity is at or above `threshold`.
    pub fn at_least(self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }
}

/// Rule categories. Each category is owned by exactly one checker; the
/// partition is exhaustive and non-overlapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    RequiredFile,
    Schema,
    Layout,
    LanguagePolicy,
    BannedPattern,
}

/// One detected deviation from a rule. Immutable once created; produced by
/// exactly one checker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub severity: Severity,
    pub rule_id: String,
    pub category: RuleCategory,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RepoPath>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,

    /// Stable identifier intended for dedup and trending. A hash of
    /// `rule_id + canonical_path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityCounts {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut counts = SeverityCounts::default();
        for v in violations {
            match v.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// The repository a report describes. The id is caller-supplied and opaque
/// (an `owner/name` pair, a checkout path, a fleet key).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepositoryMeta {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Scan summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ScanData {
    pub profile: String,

    pub files_scanned: u32,
    pub directories_scanned: u32,
    pub documents_recognized: u32,
    pub documents_parsed: u32,
    pub rules_evaluated: u32,

    pub violations_total: u32,
    pub violations_emitted: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// One scan's canonical output: an ordered violation list plus the pass/fail
/// summary. Reports are value objects; a new scan produces a new report.
///
/// The violation list, counts, and `pass` are a pure function of snapshot and
/// policy; wall-clock fields are confined to `run` so golden tests can
/// normalize them away.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceReport {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub repository: RepositoryMeta,
    pub run: RunMeta,
    pub pass: bool,
    pub counts: SeverityCounts,
    pub violations: Vec<Violation>,
    pub data: ScanData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_rank_orders_most_severe_first() {
        assert!(Severity::Critical.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
    }

    #[test]
    fn at_least_matches_blocking_contract() {
        assert!(Severity::Critical.at_least(Severity::High));
        assert!(Severity::High.at_least(Severity::High));
        assert!(!Severity::Medium.at_least(Severity::High));
        assert!(!Severity::Low.at_least(Severity::High));
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        assert_eq!(serde_json::to_string(&RuleCategory::LanguagePolicy).unwrap(), "\"language-policy\"");
    }

    #[test]
    fn counts_from_violations() {
        let v = |sev| Violation {
            severity: sev,
            rule_id: "files.readme".to_string(),
            category: RuleCategory::RequiredFile,
            message: "missing".to_string(),
            path: None,
            remediation: None,
            fingerprint: None,
            data: JsonValue::Null,
        };
        let counts = SeverityCounts::from_violations(&[
            v(Severity::Critical),
            v(Severity::Critical),
            v(Severity::Low),
        ]);
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.total(), 3);
    }
}
