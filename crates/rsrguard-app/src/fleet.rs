//! Fleet scanning: one independent scan per repository, bounded worker pool.
//!
//! Scans for different repositories share nothing but the (immutable) policy
//! text, so they parallelize freely; the pool bound exists because each scan
//! does filesystem IO and because callers publishing results downstream are
//! rate-limited. The engine never runs more concurrent scans than the
//! configured worker count.

use crate::scan::{ScanError, ScanInput};
use camino::Utf8PathBuf;
use rsrguard_repo::SnapshotLimits;
use rsrguard_settings::Overrides;
use rsrguard_types::ComplianceReport;
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct FleetTarget {
    pub repository_id: String,
    pub repo_root: Utf8PathBuf,
}

#[derive(Clone, Debug)]
pub struct FleetOptions {
    /// Upper bound on concurrent scans.
    pub max_workers: usize,
    /// Retry budget per repository for transient access failures.
    pub retry_budget: u32,
    /// Per-repository snapshot deadline.
    pub timeout: Option<Duration>,
}

impl Default for FleetOptions {
    fn default() -> Self {
        FleetOptions {
            max_workers: 4,
            retry_budget: 1,
            timeout: None,
        }
    }
}

#[derive(Debug)]
pub struct FleetOutcome {
    pub repository_id: String,
    pub result: Result<ComplianceReport, ScanError>,
}

/// Scan every target with at most `max_workers` scans in flight. Outcomes
/// come back sorted by repository id regardless of completion order.
pub fn scan_fleet(
    targets: &[FleetTarget],
    policy_text: &str,
    overrides: &Overrides,
    options: &FleetOptions,
) -> anyhow::Result<Vec<FleetOutcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.max_workers.max(1))
        .build()?;

    let mut outcomes: Vec<FleetOutcome> = pool.install(|| {
        targets
            .par_iter()
            .map(|target| {
                let mut limits = SnapshotLimits::default();
                if let Some(timeout) = options.timeout {
                    limits.deadline = Some(Instant::now() + timeout);
                }
                let input = ScanInput {
                    repo_root: &target.repo_root,
                    repository_id: &target.repository_id,
                    policy_text,
                    overrides: overrides.clone(),
                    limits,
                };
                let result =
                    crate::scan::run_scan_with_retries(&input, options.retry_budget)
                        .map(|output| output.report);
                FleetOutcome {
                    repository_id: target.repository_id.clone(),
                    result,
                }
            })
            .collect()
    });

    outcomes.sort_by(|a, b| a.repository_id.cmp(&b.repository_id));
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    fn seed_repo(root: &Utf8Path, compliant: bool) {
        std::fs::create_dir_all(root.join(".github/workflows")).expect("mkdir");
        std::fs::create_dir_all(root.join(".claude")).expect("mkdir");
        for (path, contents) in [
            ("README.adoc", "= repo\n"),
            ("LICENSE.txt", "MIT\n"),
            ("SECURITY.md", "# Security\n"),
            ("CONTRIBUTING.md", "# Contributing\n"),
            ("CODE_OF_CONDUCT.md", "# Conduct\n"),
            (".claude/CLAUDE.md", "# Conventions\n"),
            ("STATE.scm", "(state (version \"1.0.0\") (status \"active\"))\n"),
            ("META.scm", "(meta (version \"1.0.0\") (maintainers (core)))\n"),
            ("ECOSYSTEM.scm", "(ecosystem (version \"1.0.0\") (role \"library\"))\n"),
            (".github/workflows/ci.yml", "name: ci\n"),
        ] {
            std::fs::write(root.join(path), contents).expect("write");
        }
        if !compliant {
            std::fs::write(root.join("yarn.lock"), "# banned\n").expect("write");
        }
    }

    #[test]
    fn fleet_outcomes_are_independent_and_sorted() {
        let tmp = TempDir::new().expect("temp dir");
        let base = Utf8Path::from_path(tmp.path()).expect("utf8 path");

        let good = base.join("good");
        let bad = base.join("bad");
        std::fs::create_dir_all(&good).expect("mkdir");
        std::fs::create_dir_all(&bad).expect("mkdir");
        seed_repo(&good, true);
        seed_repo(&bad, false);

        let targets = vec![
            FleetTarget {
                repository_id: "org/zeta".to_string(),
                repo_root: bad.clone(),
            },
            FleetTarget {
                repository_id: "org/alpha".to_string(),
                repo_root: good.clone(),
            },
            FleetTarget {
                repository_id: "org/missing".to_string(),
                repo_root: base.join("missing"),
            },
        ];

        let outcomes = scan_fleet(
            &targets,
            "",
            &Overrides::default(),
            &FleetOptions {
                max_workers: 2,
                retry_budget: 0,
                timeout: Some(Duration::from_secs(30)),
            },
        )
        .expect("fleet");

        let ids: Vec<&str> = outcomes.iter().map(|o| o.repository_id.as_str()).collect();
        assert_eq!(ids, vec!["org/alpha", "org/missing", "org/zeta"]);

        assert!(outcomes[0].result.as_ref().expect("alpha report").pass);
        assert!(outcomes[1].result.is_err());
        let zeta = outcomes[2].result.as_ref().expect("zeta report");
        assert!(!zeta.pass);
        assert!(zeta.violations.iter().any(|v| v.rule_id == "pkg.banned.yarn"));
    }
}
