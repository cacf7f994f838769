use crate::model::SnapshotModel;
use crate::policy::EffectivePolicy;
use crate::registry::RuleRegistry;
use rsrguard_types::{ids, Violation};
use serde_json::json;

/// Language classification table: exact extension match only. Unknown
/// extensions are ignored, never flagged — precision over recall.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("go", "go"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("swift", "swift"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rs", "rust"),
    ("c", "c"),
    ("h", "c"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("zig", "zig"),
    ("hs", "haskell"),
];

/// Toolchain manifests that pin a file to a language even without sources
/// (a `go.mod` means a Go toolchain regardless of tree contents).
const LANGUAGE_MANIFESTS: &[(&str, &str)] = &[("go.mod", "go"), ("go.sum", "go")];

/// Classify a file into a language tag by exact filename or extension match.
pub fn classify(file_name: &str, extension: Option<&str>) -> Option<&'static str> {
    if let Some((_, tag)) = LANGUAGE_MANIFESTS.iter().find(|(name, _)| *name == file_name) {
        return Some(tag);
    }
    let ext = extension?;
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, tag)| *tag)
}

/// Language policy enforcer.
///
/// One `language-policy` violation per offending file — downstream consumers
/// need per-file actionability, not an aggregate. Classification never reads
/// file contents, so every violation is backed by an exact filename or
/// extension match.
pub fn run(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    if policy.banned_languages.is_empty() {
        return;
    }

    for entry in model.files() {
        let Some(tag) = classify(entry.path.file_name(), entry.path.extension()) else {
            continue;
        };
        if !policy.banned_languages.iter().any(|t| t == tag) {
            continue;
        }
        let rule_id = ids::banned_language_rule_id(tag);
        out.extend(registry.violation_with_data(
            &rule_id,
            Some(&entry.path),
            format!("{} is a {} file; {} is banned", entry.path, tag, tag),
            json!({ "language": tag }),
        ));
    }
}
