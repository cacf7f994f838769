use crate::model::SnapshotModel;
use crate::policy::EffectivePolicy;
use crate::registry::RuleRegistry;
use rsrguard_types::{ids, RepoPath, Violation};
use serde_json::json;

/// Directory-layout checker.
///
/// Validates the expected RSR tree shape against the policy: required
/// directories exist, forbidden directories are absent, and the workflow
/// directory carries enough workflow files. Every configured rule is
/// evaluated — no early return — so one scan surfaces all layout problems.
pub fn run(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    for dir in &policy.required_directories {
        if model.has_directory(&dir.path) {
            continue;
        }
        out.extend(registry.violation_with_data(
            &dir.rule_id,
            None,
            format!("{} missing (expected {})", dir.description, dir.path),
            json!({ "directory": dir.path }),
        ));
    }

    for dir in &policy.forbidden_directories {
        if !model.has_directory(&dir.path) {
            continue;
        }
        let path = RepoPath::new(&dir.path);
        out.extend(registry.violation_with_data(
            &dir.rule_id,
            Some(&path),
            format!("forbidden directory present: {}", dir.path),
            json!({ "directory": dir.path }),
        ));
    }

    check_workflows(model, policy, registry, out);
}

fn check_workflows(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    let wf = &policy.workflows;
    // A missing workflow directory is the required-directory rule's finding;
    // the count and extension rules only apply once the directory exists.
    if !model.has_directory(&wf.dir) {
        return;
    }

    let mut workflow_files = 0u32;
    for entry in model.files_under(&wf.dir) {
        match entry.path.extension() {
            Some("yml") | Some("yaml") => workflow_files += 1,
            _ => {
                if wf.enforce_extension {
                    out.extend(registry.violation_with_data(
                        ids::RULE_LAYOUT_WORKFLOW_EXTENSION,
                        Some(&entry.path),
                        format!("{} is not a workflow file", entry.path),
                        json!({ "directory": wf.dir }),
                    ));
                }
            }
        }
    }

    if workflow_files < wf.required_count {
        out.extend(registry.violation_with_data(
            ids::RULE_LAYOUT_WORKFLOW_COUNT,
            None,
            format!(
                "{} holds {} workflow file(s), {} required",
                wf.dir, workflow_files, wf.required_count
            ),
            json!({ "found": workflow_files, "required": wf.required_count }),
        ));
    }
}
