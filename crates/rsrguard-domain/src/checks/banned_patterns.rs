use crate::model::SnapshotModel;
use crate::policy::EffectivePolicy;
use crate::registry::RuleRegistry;
use rsrguard_types::{ids, Violation};
use serde_json::json;

/// Lock/config artifacts by package-manager tag. Exact basename match,
/// anywhere in the tree: a stray lockfile re-introduces the banned toolchain
/// even in an otherwise compliant-language repository.
const MANAGER_ARTIFACTS: &[(&str, &str)] = &[
    ("package-lock.json", "npm"),
    ("npm-shrinkwrap.json", "npm"),
    ("yarn.lock", "yarn"),
    ("pnpm-lock.yaml", "pnpm"),
    ("pnpm-workspace.yaml", "pnpm"),
    ("bun.lockb", "bun"),
    ("bun.lock", "bun"),
];

/// Banned-pattern scanner.
///
/// Independent of language classification: matches configuration artifacts of
/// banned package ecosystems by filename only, O(files), never inspecting
/// file bodies.
pub fn run(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    if policy.banned_package_managers.is_empty() {
        return;
    }

    for entry in model.files() {
        let name = entry.path.file_name();
        let Some((_, tag)) = MANAGER_ARTIFACTS.iter().find(|(artifact, _)| *artifact == name)
        else {
            continue;
        };
        if !policy.banned_package_managers.iter().any(|t| t == tag) {
            continue;
        }
        let rule_id = ids::banned_manager_rule_id(tag);
        out.extend(registry.violation_with_data(
            &rule_id,
            Some(&entry.path),
            format!("{} is a {} artifact; {} is banned", entry.path, tag, tag),
            json!({ "manager": tag, "artifact": name }),
        ));
    }
}
