//! Builders shared by the domain test modules.

use crate::model::{
    DocumentOutcome, EntryKind, ParseFailure, ScmValue, SnapshotEntry, SnapshotModel,
    StructuredDocument,
};
use crate::policy::{
    DirectoryPolicy, DocumentPolicy, EffectivePolicy, PathPatternKind, RequiredFilePolicy,
    WorkflowPolicy,
};
use rsrguard_types::{ids, RepoPath, Severity};
use std::collections::{BTreeMap, BTreeSet};

/// Build a snapshot from file paths, synthesizing the parent directories the
/// filesystem walk would have produced.
pub fn snapshot(files: &[&str]) -> SnapshotModel {
    let mut dirs: BTreeSet<String> = BTreeSet::new();
    for f in files {
        let mut idx = 0;
        while let Some(pos) = f[idx..].find('/') {
            let end = idx + pos;
            dirs.insert(f[..end].to_string());
            idx = end + 1;
        }
    }

    let mut entries: Vec<SnapshotEntry> = dirs
        .into_iter()
        .map(|d| SnapshotEntry {
            path: RepoPath::new(d),
            kind: EntryKind::Dir,
            size: 0,
        })
        .collect();
    entries.extend(files.iter().map(|f| SnapshotEntry {
        path: RepoPath::new(*f),
        kind: EntryKind::File,
        size: 64,
    }));
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    SnapshotModel {
        repo_root: RepoPath::new("."),
        entries,
        documents: Vec::new(),
    }
}

pub fn doc_ok(path: &str, kind: &str, pairs: &[(&str, ScmValue)]) -> DocumentOutcome {
    let mut entries = BTreeMap::new();
    for (k, v) in pairs {
        entries.insert(k.to_string(), v.clone());
    }
    DocumentOutcome {
        path: RepoPath::new(path),
        expected_kind: kind.to_string(),
        parsed: Ok(StructuredDocument {
            kind: kind.to_string(),
            entries,
        }),
    }
}

pub fn doc_failed(path: &str, kind: &str, line: u32, message: &str) -> DocumentOutcome {
    DocumentOutcome {
        path: RepoPath::new(path),
        expected_kind: kind.to_string(),
        parsed: Err(ParseFailure {
            line,
            message: message.to_string(),
        }),
    }
}

fn versioned_doc(path: &str, kind: &str, extra: &[(&str, ScmValue)]) -> DocumentOutcome {
    let mut pairs = vec![("version", ScmValue::Str("1.0.0".to_string()))];
    pairs.extend(extra.iter().cloned());
    doc_ok(path, kind, &pairs)
}

/// A snapshot satisfying every rule of [`rhodium_test_policy`].
pub fn snapshot_compliant() -> SnapshotModel {
    let mut model = snapshot(&[
        "README.adoc",
        "LICENSE.txt",
        "SECURITY.md",
        "CONTRIBUTING.md",
        "CODE_OF_CONDUCT.md",
        ".claude/CLAUDE.md",
        "STATE.scm",
        "META.scm",
        "ECOSYSTEM.scm",
        ".github/workflows/ci.yml",
        "Cargo.toml",
        "src/lib.rs",
    ]);
    model.documents = vec![
        versioned_doc(
            "STATE.scm",
            "state",
            &[("status", ScmValue::Str("active".to_string()))],
        ),
        versioned_doc(
            "META.scm",
            "meta",
            &[(
                "maintainers",
                ScmValue::List(vec![ScmValue::Str("core".to_string())]),
            )],
        ),
        versioned_doc(
            "ECOSYSTEM.scm",
            "ecosystem",
            &[("role", ScmValue::Str("library".to_string()))],
        ),
    ];
    model
}

fn required_file(
    rule_id: &str,
    pattern: &str,
    severity: Severity,
    description: &str,
) -> RequiredFilePolicy {
    RequiredFilePolicy {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        kind: PathPatternKind::File,
        severity,
        description: description.to_string(),
        remediation: format!("Add {pattern} at the repository root."),
    }
}

/// A policy mirroring the rhodium preset, local to the domain tests (the
/// shipping preset lives in rsrguard-settings).
pub fn rhodium_test_policy() -> EffectivePolicy {
    let mut policy = EffectivePolicy::empty("rhodium-test");

    policy.required_files = vec![
        required_file(ids::RULE_FILES_README, "README.adoc", Severity::Critical, "AsciiDoc README"),
        required_file(ids::RULE_FILES_LICENSE, "LICENSE.txt", Severity::Critical, "License file"),
        required_file(ids::RULE_FILES_SECURITY, "SECURITY.md", Severity::High, "Security policy"),
        required_file(
            ids::RULE_FILES_CONTRIBUTING,
            "CONTRIBUTING.md",
            Severity::Medium,
            "Contributing guidelines",
        ),
        required_file(
            ids::RULE_FILES_CODE_OF_CONDUCT,
            "CODE_OF_CONDUCT.md",
            Severity::Medium,
            "Code of conduct",
        ),
        required_file(
            ids::RULE_FILES_ASSISTANT_GUIDE,
            ".claude/CLAUDE.md",
            Severity::Low,
            "AI assistant instructions",
        ),
        required_file(ids::RULE_FILES_STATE_DOC, "STATE.scm", Severity::High, "Project state document"),
        required_file(ids::RULE_FILES_META_DOC, "META.scm", Severity::High, "Meta document"),
        required_file(
            ids::RULE_FILES_ECOSYSTEM_DOC,
            "ECOSYSTEM.scm",
            Severity::High,
            "Ecosystem document",
        ),
    ];
    policy.required_directories = vec![DirectoryPolicy {
        rule_id: ids::RULE_LAYOUT_WORKFLOWS_DIR.to_string(),
        path: ".github/workflows".to_string(),
        severity: Severity::High,
        description: "GitHub Actions workflows directory".to_string(),
        remediation: "Create .github/workflows with at least one workflow.".to_string(),
    }];
    policy.forbidden_directories = vec![DirectoryPolicy {
        rule_id: ids::RULE_LAYOUT_NO_NODE_MODULES.to_string(),
        path: "node_modules".to_string(),
        severity: Severity::High,
        description: "vendored node_modules tree".to_string(),
        remediation: "Delete node_modules; dependency trees are never committed.".to_string(),
    }];
    policy.banned_languages = vec!["go".to_string()];
    policy.banned_package_managers =
        vec!["npm".to_string(), "yarn".to_string(), "pnpm".to_string(), "bun".to_string()];
    policy.workflows = WorkflowPolicy::default();
    policy.documents = vec![
        DocumentPolicy {
            path: "STATE.scm".to_string(),
            kind: "state".to_string(),
            required_keys: vec!["version".to_string(), "status".to_string()],
            version_key: Some("version".to_string()),
        },
        DocumentPolicy {
            path: "META.scm".to_string(),
            kind: "meta".to_string(),
            required_keys: vec!["version".to_string(), "maintainers".to_string()],
            version_key: Some("version".to_string()),
        },
        DocumentPolicy {
            path: "ECOSYSTEM.scm".to_string(),
            kind: "ecosystem".to_string(),
            required_keys: vec!["version".to_string(), "role".to_string()],
            version_key: Some("version".to_string()),
        },
    ];
    policy
}
