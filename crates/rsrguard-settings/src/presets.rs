use rsrguard_domain::policy::{
    DirectoryPolicy, DocumentPolicy, EffectivePolicy, PathPatternKind, RequiredFilePolicy,
    WorkflowPolicy,
};
use rsrguard_types::{ids, Severity};

/// Preset profiles are opinionated defaults.
///
/// `rhodium` is the RSR standard in full. `lenient` runs the same rules but
/// only critical violations block — fleets use it while onboarding
/// repositories. Keep these small and readable; anything bespoke belongs in
/// the policy file.
pub fn preset(profile: &str) -> EffectivePolicy {
    match profile {
        "lenient" => lenient_profile(),
        // default
        _ => rhodium_profile(),
    }
}

fn lenient_profile() -> EffectivePolicy {
    let mut policy = rhodium_profile();
    policy.profile = "lenient".to_string();
    policy.fail_threshold = Severity::Critical;
    policy
}

fn rhodium_profile() -> EffectivePolicy {
    let mut policy = EffectivePolicy::empty("rhodium");
    policy.fail_threshold = Severity::High;
    policy.max_violations = 500;

    policy.required_files = vec![
        required_file(
            ids::RULE_FILES_README,
            "README.adoc",
            Severity::Critical,
            "AsciiDoc README",
            "Add README.adoc at the repository root (convert any README.md).",
        ),
        required_file(
            ids::RULE_FILES_LICENSE,
            "LICENSE.txt",
            Severity::Critical,
            "License file",
            "Add LICENSE.txt with an RSR-approved license text.",
        ),
        required_file(
            ids::RULE_FILES_SECURITY,
            "SECURITY.md",
            Severity::High,
            "Security policy",
            "Add SECURITY.md describing how to report vulnerabilities.",
        ),
        required_file(
            ids::RULE_FILES_CONTRIBUTING,
            "CONTRIBUTING.md",
            Severity::Medium,
            "Contributing guidelines",
            "Add CONTRIBUTING.md from the template repository.",
        ),
        required_file(
            ids::RULE_FILES_CODE_OF_CONDUCT,
            "CODE_OF_CONDUCT.md",
            Severity::Medium,
            "Code of conduct",
            "Add CODE_OF_CONDUCT.md from the template repository.",
        ),
        required_file(
            ids::RULE_FILES_ASSISTANT_GUIDE,
            ".claude/CLAUDE.md",
            Severity::Low,
            "AI assistant instructions",
            "Add .claude/CLAUDE.md so assistant tooling picks up repo conventions.",
        ),
        required_file(
            ids::RULE_FILES_STATE_DOC,
            "STATE.scm",
            Severity::High,
            "Project state document",
            "Add STATE.scm; fleet bots read it before any analysis.",
        ),
        required_file(
            ids::RULE_FILES_META_DOC,
            "META.scm",
            Severity::High,
            "Meta document",
            "Add META.scm describing ownership and provenance.",
        ),
        required_file(
            ids::RULE_FILES_ECOSYSTEM_DOC,
            "ECOSYSTEM.scm",
            Severity::High,
            "Ecosystem document",
            "Add ECOSYSTEM.scm describing the repository's fleet position.",
        ),
    ];

    policy.required_directories = vec![DirectoryPolicy {
        rule_id: ids::RULE_LAYOUT_WORKFLOWS_DIR.to_string(),
        path: ".github/workflows".to_string(),
        severity: Severity::High,
        description: "GitHub Actions workflows directory".to_string(),
        remediation: "Create .github/workflows with at least one workflow.".to_string(),
    }];

    policy.forbidden_directories = vec![
        DirectoryPolicy {
            rule_id: ids::RULE_LAYOUT_NO_NODE_MODULES.to_string(),
            path: "node_modules".to_string(),
            severity: Severity::High,
            description: "vendored node_modules tree".to_string(),
            remediation: "Delete node_modules; dependency trees are never committed.".to_string(),
        },
        DirectoryPolicy {
            rule_id: ids::RULE_LAYOUT_NO_VENDOR.to_string(),
            path: "vendor".to_string(),
            severity: Severity::Medium,
            description: "vendored dependency tree".to_string(),
            remediation: "Remove vendor/ and declare dependencies through the manifest.".to_string(),
        },
    ];

    policy.banned_languages = vec!["go".to_string()];
    policy.banned_package_managers = vec![
        "npm".to_string(),
        "yarn".to_string(),
        "pnpm".to_string(),
        "bun".to_string(),
    ];

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

fn required_file(
    rule_id: &str,
    pattern: &str,
    severity: Severity,
    description: &str,
    remediation: &str,
) -> RequiredFilePolicy {
    RequiredFilePolicy {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        kind: PathPatternKind::File,
        severity,
        description: description.to_string(),
        remediation: remediation.to_string(),
    }
}
