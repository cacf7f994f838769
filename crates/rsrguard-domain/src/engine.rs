use crate::checks;
use crate::model::{EntryKind, SnapshotModel};
use crate::policy::EffectivePolicy;
use crate::registry::RuleRegistry;
use crate::report::DomainReport;
use rsrguard_types::{ScanData, SeverityCounts, Violation};

/// Run every checker against the snapshot and aggregate the result.
///
/// Pure function of its inputs: re-evaluating the same snapshot and policy
/// yields an identical report, and the aggregation is independent of checker
/// completion order.
pub fn evaluate(
    model: &SnapshotModel,
    registry: &RuleRegistry,
    policy: &EffectivePolicy,
) -> DomainReport {
    let mut violations = checks::run_all(model, policy, registry);

    debug_assert!(
        violations.iter().all(|v| registry.contains(&v.rule_id)),
        "checker produced a violation for an unregistered rule"
    );

    // Deterministic ordering before truncation.
    violations.sort_by(compare_violations);

    let total = violations.len() as u32;

    let mut emitted = violations;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > policy.max_violations {
        emitted.truncate(policy.max_violations);
        truncated_reason = Some(format!(
            "violations truncated to max_violations={}",
            policy.max_violations
        ));
    }

    // Sorted most-severe-first, so truncation can only drop violations below
    // the blocking threshold once any blocking violation exists.
    let pass = !emitted.iter().any(|v| v.severity.at_least(policy.fail_threshold));
    let counts = SeverityCounts::from_violations(&emitted);

    let documents_parsed = model.documents.iter().filter(|d| d.parsed.is_ok()).count() as u32;
    let data = ScanData {
        profile: policy.profile.clone(),
        files_scanned: model.files().count() as u32,
        directories_scanned: model
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Dir)
            .count() as u32,
        documents_recognized: model.documents.len() as u32,
        documents_parsed,
        rules_evaluated: registry.len() as u32,
        violations_total: total,
        violations_emitted: emitted.len() as u32,
        truncated_reason,
    };

    DomainReport {
        pass,
        violations: emitted,
        counts,
        data,
    }
}

fn compare_violations(a: &Violation, b: &Violation) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (critical -> high -> medium -> low)
    // 2) rule_id
    // 3) path (missing last)
    // 4) message
    fn path_key(v: &Violation) -> (u8, &str) {
        match &v.path {
            Some(p) => (0u8, p.as_str()),
            None => (1u8, ""),
        }
    }

    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then(a.rule_id.cmp(&b.rule_id))
        .then(path_key(a).cmp(&path_key(b)))
        .then(a.message.cmp(&b.message))
}
