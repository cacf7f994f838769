use super::{banned_patterns, classify, language_policy, layout, required_files, structured_docs};
use crate::model::ScmValue;
use crate::policy::{EffectivePolicy, PathPatternKind, RequiredFilePolicy};
use crate::registry::RuleRegistry;
use crate::test_support::{doc_failed, doc_ok, rhodium_test_policy, snapshot, snapshot_compliant};
use rsrguard_types::{ids, RuleCategory, Severity, Violation};

fn registry(policy: &EffectivePolicy) -> RuleRegistry {
    RuleRegistry::from_policy(policy).expect("registry")
}

fn run_one(
    check: fn(&crate::model::SnapshotModel, &EffectivePolicy, &RuleRegistry, &mut Vec<Violation>),
    model: &crate::model::SnapshotModel,
    policy: &EffectivePolicy,
) -> Vec<Violation> {
    let reg = registry(policy);
    let mut out = Vec::new();
    check(model, policy, &reg, &mut out);
    out
}

// --- required files ---

#[test]
fn required_files_reports_each_missing_pattern() {
    let policy = rhodium_test_policy();
    let model = snapshot(&["README.adoc", "src/lib.rs"]);

    let out = run_one(required_files::run, &model, &policy);
    assert_eq!(out.len(), policy.required_files.len() - 1);
    assert!(out.iter().all(|v| v.category == RuleCategory::RequiredFile));
    assert!(!out.iter().any(|v| v.rule_id == ids::RULE_FILES_README));
}

#[test]
fn required_files_satisfied_emits_nothing() {
    let policy = rhodium_test_policy();
    let model = snapshot_compliant();
    assert!(run_one(required_files::run, &model, &policy).is_empty());
}

#[test]
fn required_files_supports_glob_patterns() {
    let mut policy = EffectivePolicy::empty("test");
    policy.required_files = vec![RequiredFilePolicy {
        rule_id: "files.changelog".to_string(),
        pattern: "CHANGELOG.*".to_string(),
        kind: PathPatternKind::File,
        severity: Severity::Medium,
        description: "Changelog".to_string(),
        remediation: "Add a changelog.".to_string(),
    }];

    let hit = snapshot(&["CHANGELOG.adoc"]);
    assert!(run_one(required_files::run, &hit, &policy).is_empty());

    let miss = snapshot(&["docs/CHANGELOG.adoc"]);
    let out = run_one(required_files::run, &miss, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, "files.changelog");
}

#[test]
fn required_directory_pattern_satisfied_by_nested_entry() {
    let mut policy = EffectivePolicy::empty("test");
    policy.required_files = vec![RequiredFilePolicy {
        rule_id: "files.well_known".to_string(),
        pattern: ".well-known".to_string(),
        kind: PathPatternKind::Directory,
        severity: Severity::Medium,
        description: "well-known directory".to_string(),
        remediation: "Add .well-known/.".to_string(),
    }];

    let hit = snapshot(&[".well-known/security.txt"]);
    assert!(run_one(required_files::run, &hit, &policy).is_empty());

    // A file named like the directory does not satisfy a directory pattern.
    let miss = snapshot(&[".well-known"]);
    assert_eq!(run_one(required_files::run, &miss, &policy).len(), 1);
}

// --- structured documents ---

#[test]
fn parse_failure_is_isolated_to_its_file() {
    let policy = rhodium_test_policy();
    let mut model = snapshot_compliant();
    model.documents[0] = doc_failed("STATE.scm", "state", 3, "unbalanced parenthesis");

    let out = run_one(structured_docs::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, ids::RULE_SCHEMA_PARSE);
    assert_eq!(out[0].severity, Severity::Critical);
    assert_eq!(out[0].path.as_ref().unwrap().as_str(), "STATE.scm");
    assert!(out[0].message.contains("unbalanced parenthesis"));
}

#[test]
fn shape_rules_report_missing_keys_individually() {
    let policy = rhodium_test_policy();
    let mut model = snapshot_compliant();
    // Drop both required keys from META.scm.
    model.documents[1] = doc_ok("META.scm", "meta", &[]);

    let out = run_one(structured_docs::run, &model, &policy);
    let keys: Vec<&str> = out
        .iter()
        .filter(|v| v.rule_id == ids::RULE_SCHEMA_MISSING_KEY)
        .map(|v| v.data["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"version"));
    assert!(keys.contains(&"maintainers"));
}

#[test]
fn wrong_document_kind_is_flagged() {
    let policy = rhodium_test_policy();
    let mut model = snapshot_compliant();
    model.documents[0] = doc_ok(
        "STATE.scm",
        "state",
        &[
            ("version", ScmValue::Str("1.0.0".to_string())),
            ("status", ScmValue::Str("active".to_string())),
        ],
    );
    if let Ok(doc) = &mut model.documents[0].parsed {
        doc.kind = "status".to_string();
    }

    let out = run_one(structured_docs::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, ids::RULE_SCHEMA_KIND);
}

#[test]
fn malformed_version_and_wrong_type_are_distinct_rules() {
    let policy = rhodium_test_policy();
    let mut model = snapshot_compliant();
    model.documents[0] = doc_ok(
        "STATE.scm",
        "state",
        &[
            ("version", ScmValue::Str("v1".to_string())),
            ("status", ScmValue::Str("active".to_string())),
        ],
    );
    let out = run_one(structured_docs::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, ids::RULE_SCHEMA_VERSION);

    let mut model = snapshot_compliant();
    model.documents[0] = doc_ok(
        "STATE.scm",
        "state",
        &[
            ("version", ScmValue::Int(1)),
            ("status", ScmValue::Str("active".to_string())),
        ],
    );
    let out = run_one(structured_docs::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, ids::RULE_SCHEMA_KEY_TYPE);
    assert_eq!(out[0].data["found"], "integer");
}

#[test]
fn unrecognized_documents_are_skipped() {
    let policy = rhodium_test_policy();
    let mut model = snapshot_compliant();
    model
        .documents
        .push(doc_failed("NOTES.scm", "notes", 1, "not even close"));

    // NOTES.scm has no document policy, so its failure is invisible here.
    assert!(run_one(structured_docs::run, &model, &policy).is_empty());
}

// --- layout ---

#[test]
fn layout_enumerates_every_failing_rule() {
    let policy = rhodium_test_policy();
    // Missing workflows dir AND a forbidden node_modules tree.
    let model = snapshot(&["node_modules/left-pad/index.js", "src/lib.rs"]);

    let out = run_one(layout::run, &model, &policy);
    let ids_seen: Vec<&str> = out.iter().map(|v| v.rule_id.as_str()).collect();
    assert!(ids_seen.contains(&ids::RULE_LAYOUT_WORKFLOWS_DIR));
    assert!(ids_seen.contains(&ids::RULE_LAYOUT_NO_NODE_MODULES));
    assert_eq!(out.len(), 2);
}

#[test]
fn workflow_count_applies_once_directory_exists() {
    let policy = rhodium_test_policy();

    // Directory exists but holds no workflow files.
    let model = snapshot(&[".github/workflows/README.md"]);
    let out = run_one(layout::run, &model, &policy);
    let ids_seen: Vec<&str> = out.iter().map(|v| v.rule_id.as_str()).collect();
    assert!(ids_seen.contains(&ids::RULE_LAYOUT_WORKFLOW_COUNT));
    assert!(ids_seen.contains(&ids::RULE_LAYOUT_WORKFLOW_EXTENSION));

    // Directory missing: only the required-directory rule fires.
    let model = snapshot(&["src/lib.rs"]);
    let out = run_one(layout::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, ids::RULE_LAYOUT_WORKFLOWS_DIR);
}

#[test]
fn compliant_layout_emits_nothing() {
    let policy = rhodium_test_policy();
    let model = snapshot_compliant();
    assert!(run_one(layout::run, &model, &policy).is_empty());
}

// --- language policy ---

#[test]
fn classify_is_exact_match_only() {
    assert_eq!(classify("main.go", Some("go")), Some("go"));
    assert_eq!(classify("go.mod", None), Some("go"));
    assert_eq!(classify("lib.rs", Some("rs")), Some("rust"));
    assert_eq!(classify("README", None), None);
    assert_eq!(classify("data.gone", Some("gone")), None);
}

#[test]
fn banned_language_flags_each_file_at_high() {
    let policy = rhodium_test_policy();
    let model = snapshot(&["cmd/a/main.go", "cmd/b/main.go", "src/lib.rs", "go.mod"]);

    let out = run_one(language_policy::run, &model, &policy);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|v| v.severity == Severity::High));
    assert!(out.iter().all(|v| v.category == RuleCategory::LanguagePolicy));
    assert!(out.iter().all(|v| v.data["language"] == "go"));
}

#[test]
fn non_banned_languages_are_ignored() {
    let mut policy = rhodium_test_policy();
    policy.banned_languages = vec!["python".to_string()];
    let model = snapshot(&["main.go", "tool.py"]);

    let out = run_one(language_policy::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].path.as_ref().unwrap().as_str(), "tool.py");
}

// --- banned patterns ---

#[test]
fn banned_manager_artifacts_match_at_any_depth() {
    let policy = rhodium_test_policy();
    let model = snapshot(&[
        "package-lock.json",
        "web/frontend/yarn.lock",
        "deno.json",
        "Cargo.lock",
    ]);

    let out = run_one(banned_patterns::run, &model, &policy);
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|v| v.category == RuleCategory::BannedPattern));
    assert!(out.iter().all(|v| v.severity == Severity::High));
    let rules: Vec<&str> = out.iter().map(|v| v.rule_id.as_str()).collect();
    assert!(rules.contains(&"pkg.banned.npm"));
    assert!(rules.contains(&"pkg.banned.yarn"));
}

#[test]
fn manager_table_respects_policy_tags() {
    let mut policy = rhodium_test_policy();
    policy.banned_package_managers = vec!["pnpm".to_string()];
    let model = snapshot(&["yarn.lock", "pnpm-lock.yaml"]);

    let out = run_one(banned_patterns::run, &model, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rule_id, "pkg.banned.pnpm");
}

#[test]
fn category_partition_between_language_and_manager_tables() {
    let policy = rhodium_test_policy();
    let model = snapshot(&["go.sum", "yarn.lock"]);

    // go.sum is a language-toolchain manifest, never a banned-pattern match;
    // yarn.lock is a manager artifact, never a language match.
    let lang = run_one(language_policy::run, &model, &policy);
    let pkg = run_one(banned_patterns::run, &model, &policy);

    assert_eq!(lang.len(), 1);
    assert_eq!(lang[0].path.as_ref().unwrap().as_str(), "go.sum");
    assert_eq!(pkg.len(), 1);
    assert_eq!(pkg[0].path.as_ref().unwrap().as_str(), "yarn.lock");
}
