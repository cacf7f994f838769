use crate::model::{ScmValue, SnapshotModel, StructuredDocument};
use crate::policy::{DocumentPolicy, EffectivePolicy};
use crate::registry::RuleRegistry;
use rsrguard_types::{ids, RepoPath, Violation};
use serde_json::json;

/// Structured-document validator.
///
/// Consumes the parse outcomes captured at snapshot time. A parse failure
/// degrades to a single critical `schema` violation for that file and
/// short-circuits the shape rules for that file only; every other document is
/// still validated in full. Absent documents are not this checker's concern
/// (the required-files checker owns presence).
pub fn run(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    for outcome in &model.documents {
        let Some(spec) = policy.document_for(outcome.path.as_str()) else {
            continue;
        };
        match &outcome.parsed {
            Err(failure) => {
                let Some(v) = registry.violation_with_data(
                    ids::RULE_SCHEMA_PARSE,
                    Some(&outcome.path),
                    format!("{} is not well-formed: {}", outcome.path, failure),
                    json!({ "line": failure.line }),
                ) else {
                    continue;
                };
                out.push(v);
            }
            Ok(doc) => check_shape(doc, spec, &outcome.path, registry, out),
        }
    }
}

fn check_shape(
    doc: &StructuredDocument,
    spec: &DocumentPolicy,
    path: &RepoPath,
    registry: &RuleRegistry,
    out: &mut Vec<Violation>,
) {
    if doc.kind != spec.kind {
        out.extend(registry.violation_with_data(
            ids::RULE_SCHEMA_KIND,
            Some(path),
            format!(
                "{} declares kind '{}', expected '{}'",
                path, doc.kind, spec.kind
            ),
            json!({ "expected": spec.kind, "found": doc.kind }),
        ));
    }

    for key in &spec.required_keys {
        if !doc.entries.contains_key(key) {
            out.extend(registry.violation_with_data(
                ids::RULE_SCHEMA_MISSING_KEY,
                Some(path),
                format!("{path} is missing required key '{key}'"),
                json!({ "key": key }),
            ));
        }
    }

    if let Some(version_key) = &spec.version_key {
        if let Some(value) = doc.entries.get(version_key) {
            match value {
                ScmValue::Str(s) if is_semver(s) => {}
                ScmValue::Str(s) => {
                    out.extend(registry.violation_with_data(
                        ids::RULE_SCHEMA_VERSION,
                        Some(path),
                        format!(
                            "{path}: '{version_key}' is \"{s}\", not a semantic version"
                        ),
                        json!({ "key": version_key, "value": s }),
                    ));
                }
                other => {
                    out.extend(registry.violation_with_data(
                        ids::RULE_SCHEMA_KEY_TYPE,
                        Some(path),
                        format!(
                            "{path}: '{version_key}' must be a string, found {}",
                            other.type_name()
                        ),
                        json!({ "key": version_key, "found": other.type_name() }),
                    ));
                }
            }
        }
        // A missing version key is already the missing-key rule's finding.
    }
}

/// Well-formed `MAJOR.MINOR.PATCH` with an optional `-pre`/`+build` suffix.
/// Strict on the numeric core: no leading `v`, no wildcard segments.
fn is_semver(s: &str) -> bool {
    let core = match s.split_once(['-', '+']) {
        Some((_, "")) => return false,
        Some((core, _)) => core,
        None => s,
    };
    if core.is_empty() {
        return false;
    }

    let mut segments = 0;
    for segment in core.split('.') {
        segments += 1;
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if segment.len() > 1 && segment.starts_with('0') {
            return false;
        }
    }
    segments == 3
}
