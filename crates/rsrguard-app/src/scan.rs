//! The `scan` use case: evaluate one repository and produce a compliance
//! report.

use camino::Utf8Path;
use rsrguard_domain::registry::{RegistryError, RuleRegistry};
use rsrguard_repo::{build_snapshot, FsSource, SnapshotError, SnapshotLimits, SnapshotSource};
use rsrguard_settings::{Overrides, ResolvedPolicy};
use rsrguard_types::{
    ComplianceReport, RepositoryMeta, RunMeta, ToolMeta, SCHEMA_REPORT_V1,
};
use time::OffsetDateTime;

pub const EXIT_PASS: i32 = 0;
pub const EXIT_ORCHESTRATION_FAILURE: i32 = 1;
pub const EXIT_VIOLATIONS: i32 = 2;

/// Input for the scan use case.
#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    /// Repository root path.
    pub repo_root: &'a Utf8Path,
    /// Opaque repository identifier carried into the report.
    pub repository_id: &'a str,
    /// Policy file contents (empty string if not found; preset defaults apply).
    pub policy_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Bounds on snapshot construction.
    pub limits: SnapshotLimits,
}

/// Output from the scan use case.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    /// The generated report.
    pub report: ComplianceReport,
    /// The resolved policy used.
    pub resolved: ResolvedPolicy,
}

/// Orchestration failure: the scan aborted and no report exists. Disjoint
/// from a failing-but-valid report, which is a successful scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Malformed policy configuration. Fatal; never retried.
    #[error("invalid policy configuration: {0:#}")]
    Policy(#[source] anyhow::Error),

    /// The policy produced an empty or inconsistent rule registry.
    #[error("invalid rule registry: {0}")]
    Registry(#[source] RegistryError),

    /// Snapshot construction failed (unreadable tree, timeout, size bound).
    #[error("snapshot failed: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl ScanError {
    /// Transient repository-access failures are worth a bounded retry;
    /// configuration problems are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScanError::Snapshot(e) if e.is_retryable())
    }
}

/// Run one scan against a local checkout.
pub fn run_scan(input: &ScanInput<'_>) -> Result<ScanOutput, ScanError> {
    let source = FsSource::new(input.repo_root);
    run_scan_with_source(&source, input)
}

/// Run one scan against any snapshot source (local checkout, API-backed
/// virtual filesystem, in-memory test tree).
pub fn run_scan_with_source(
    source: &dyn SnapshotSource,
    input: &ScanInput<'_>,
) -> Result<ScanOutput, ScanError> {
    let started_at = OffsetDateTime::now_utc();

    // Parse policy (empty is allowed, preset defaults apply).
    let cfg = if input.policy_text.trim().is_empty() {
        rsrguard_settings::PolicyConfigV1::default()
    } else {
        rsrguard_settings::parse_policy_toml(input.policy_text).map_err(ScanError::Policy)?
    };
    let resolved = rsrguard_settings::resolve_policy(cfg, input.overrides.clone())
        .map_err(ScanError::Policy)?;

    let registry = RuleRegistry::from_policy(&resolved.effective).map_err(ScanError::Registry)?;

    // The snapshot is owned here, lent to the checkers, and dropped with the
    // report; nothing external is mutated before the report exists, so
    // cancelling a scan mid-flight is always safe.
    let model = build_snapshot(source, &resolved.effective, &input.limits)?;

    let domain = rsrguard_domain::evaluate(&model, &registry, &resolved.effective);

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    let report = ComplianceReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "rsrguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        repository: RepositoryMeta {
            id: input.repository_id.to_string(),
        },
        run: RunMeta {
            started_at,
            finished_at,
            duration_ms: Some(duration_ms),
        },
        pass: domain.pass,
        counts: domain.counts,
        violations: domain.violations,
        data: domain.data,
    };

    Ok(ScanOutput { report, resolved })
}

/// Retry wrapper: only transient failures are retried, and only up to the
/// caller-supplied budget. A budget of zero means a single attempt.
pub fn run_scan_with_retries(
    input: &ScanInput<'_>,
    retry_budget: u32,
) -> Result<ScanOutput, ScanError> {
    let mut attempts = 0;
    loop {
        match run_scan(input) {
            Err(err) if err.is_retryable() && attempts < retry_budget => {
                attempts += 1;
            }
            other => return other,
        }
    }
}

/// Map a report to the CLI exit code: 0 = pass, 2 = failing report.
/// Orchestration failures use exit code 1 and never reach this function.
pub fn report_exit_code(report: &ComplianceReport) -> i32 {
    if report.pass {
        EXIT_PASS
    } else {
        EXIT_VIOLATIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use rsrguard_repo::MemorySource;
    use tempfile::TempDir;

    const STATE: &str = "(state (version \"1.0.0\") (status \"active\"))\n";
    const META: &str = "(meta (version \"1.0.0\") (maintainers (core)))\n";
    const ECOSYSTEM: &str = "(ecosystem (version \"1.0.0\") (role \"library\"))\n";

    fn compliant_source() -> MemorySource {
        MemorySource::new()
            .with_file("README.adoc", "= widget\n")
            .with_file("LICENSE.txt", "MIT\n")
            .with_file("SECURITY.md", "# Security\n")
            .with_file("CONTRIBUTING.md", "# Contributing\n")
            .with_file("CODE_OF_CONDUCT.md", "# Conduct\n")
            .with_file(".claude/CLAUDE.md", "# Conventions\n")
            .with_file("STATE.scm", STATE)
            .with_file("META.scm", META)
            .with_file("ECOSYSTEM.scm", ECOSYSTEM)
            .with_file(".github/workflows/ci.yml", "name: ci\n")
            .with_file("Cargo.toml", "[package]\nname = \"widget\"\n")
            .with_file("src/lib.rs", "pub fn noop() {}\n")
    }

    fn input<'a>() -> ScanInput<'a> {
        ScanInput {
            repo_root: Utf8Path::new("."),
            repository_id: "acme/widget",
            policy_text: "",
            overrides: Overrides::default(),
            limits: SnapshotLimits::default(),
        }
    }

    #[test]
    fn compliant_tree_passes_with_zero_violations() {
        let output = run_scan_with_source(&compliant_source(), &input()).expect("scan");
        assert!(output.report.pass);
        assert!(output.report.violations.is_empty());
        assert_eq!(output.report.schema, SCHEMA_REPORT_V1);
        assert_eq!(output.report.repository.id, "acme/widget");
        assert_eq!(report_exit_code(&output.report), EXIT_PASS);
    }

    #[test]
    fn scan_core_output_is_idempotent() {
        let source = compliant_source().with_file("main.go", "package main\n");
        let a = run_scan_with_source(&source, &input()).expect("scan");
        let b = run_scan_with_source(&source, &input()).expect("scan");

        assert_eq!(a.report.violations, b.report.violations);
        assert_eq!(a.report.pass, b.report.pass);
        assert_eq!(a.report.counts, b.report.counts);
        assert_eq!(a.report.data, b.report.data);
    }

    #[test]
    fn failing_report_is_not_an_error() {
        let output =
            run_scan_with_source(&MemorySource::new(), &input()).expect("empty tree still scans");
        assert!(!output.report.pass);
        assert!(output.report.counts.critical >= 2);
        assert_eq!(report_exit_code(&output.report), EXIT_VIOLATIONS);
    }

    #[test]
    fn malformed_policy_is_fatal_and_not_retryable() {
        let mut scan_input = input();
        scan_input.policy_text = "fail_threshold = \"fatal\"";
        let err = run_scan_with_source(&compliant_source(), &scan_input).unwrap_err();
        assert!(matches!(err, ScanError::Policy(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn unreadable_repository_is_an_orchestration_error() {
        let scan_input = ScanInput {
            repo_root: Utf8Path::new("/nonexistent/rsrguard/checkout"),
            ..input()
        };
        let err = run_scan(&scan_input).unwrap_err();
        assert!(matches!(err, ScanError::Snapshot(SnapshotError::Io(_))));
        assert!(err.is_retryable());
    }

    #[test]
    fn retries_are_bounded_by_the_budget() {
        let scan_input = ScanInput {
            repo_root: Utf8Path::new("/nonexistent/rsrguard/checkout"),
            ..input()
        };
        // The error persists; a budget of 2 means exactly 3 attempts, then
        // the error surfaces.
        let err = run_scan_with_retries(&scan_input, 2).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn scan_runs_against_a_real_checkout() {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        std::fs::write(root.join("README.adoc"), "= widget\n").expect("write");
        std::fs::write(root.join("STATE.scm"), "(state (version \"oops\"))\n").expect("write");

        let scan_input = ScanInput {
            repo_root: root,
            ..input()
        };
        let output = run_scan(&scan_input).expect("scan");
        assert!(!output.report.pass);
        // The malformed version yields exactly one schema.version_format
        // violation plus the missing-key violation for status.
        let schema_violations: Vec<_> = output
            .report
            .violations
            .iter()
            .filter(|v| v.rule_id.starts_with("schema."))
            .collect();
        assert_eq!(schema_violations.len(), 2);
    }
}
