use crate::model::SnapshotModel;
use crate::policy::{EffectivePolicy, PathPatternKind, RequiredFilePolicy};
use crate::registry::RuleRegistry;
use globset::Glob;
use rsrguard_types::Violation;
use serde_json::json;

/// Required-files checker.
///
/// For each configured pattern not matched by any snapshot entry, emits one
/// `required-file` violation. Matching is path-only; contents are never read.
/// A directory-kind pattern is satisfied by any entry nested under it.
pub fn run(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    for rf in &policy.required_files {
        if is_satisfied(model, rf) {
            continue;
        }
        let Some(v) = registry.violation_with_data(
            &rf.rule_id,
            None,
            format!("{} missing (expected {})", rf.description, rf.pattern),
            json!({ "pattern": rf.pattern }),
        ) else {
            continue;
        };
        out.push(v);
    }
}

fn is_satisfied(model: &SnapshotModel, rf: &RequiredFilePolicy) -> bool {
    match rf.kind {
        PathPatternKind::Directory => model.has_directory(&rf.pattern),
        PathPatternKind::File => {
            if !is_glob(&rf.pattern) {
                return model.contains_file(&rf.pattern);
            }
            // Patterns are validated when the policy is resolved.
            let matcher = Glob::new(&rf.pattern)
                .expect("required-file patterns must be validated in rsrguard-settings")
                .compile_matcher();
            model.files().any(|e| matcher.is_match(e.path.as_str()))
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}
