use rsrguard_types::Severity;
use std::collections::{BTreeMap, BTreeSet};

/// The resolved, immutable policy a scan runs against.
///
/// Policy is input, loaded once per process and passed by reference into the
/// engine; the engine never hardcodes policy values. All collections are kept
/// in deterministic order.
#[derive(Clone, Debug)]
pub struct EffectivePolicy {
    pub profile: String,

    /// A violation at or above this severity fails the scan. Default `High`.
    pub fail_threshold: Severity,

    /// Emitted violations are truncated to this count (most severe kept).
    pub max_violations: usize,

    pub required_files: Vec<RequiredFilePolicy>,
    pub required_directories: Vec<DirectoryPolicy>,
    pub forbidden_directories: Vec<DirectoryPolicy>,

    /// Language tags whose files are banned (exact extension/manifest match).
    pub banned_languages: Vec<String>,

    /// Package-manager tags whose artifacts are banned anywhere in the tree.
    pub banned_package_managers: Vec<String>,

    pub workflows: WorkflowPolicy,
    pub documents: Vec<DocumentPolicy>,

    /// Severity applied to structured-document shape rules (parse errors are
    /// always critical).
    pub schema_severity: Severity,

    /// Rule ids removed from the registry by configuration.
    pub disabled_rules: BTreeSet<String>,

    /// Per-rule severity overrides, applied when the registry is built.
    pub severity_overrides: BTreeMap<String, Severity>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathPatternKind {
    File,
    Directory,
}

/// One required-file rule: a plain path or a simple glob pattern.
#[derive(Clone, Debug)]
pub struct RequiredFilePolicy {
    pub rule_id: String,
    pub pattern: String,
    pub kind: PathPatternKind,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
}

/// One required/forbidden top-level directory rule.
#[derive(Clone, Debug)]
pub struct DirectoryPolicy {
    pub rule_id: String,
    pub path: String,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
}

/// Workflow layout rules: the CI directory must carry enough workflow files,
/// and each must use a workflow extension.
#[derive(Clone, Debug)]
pub struct WorkflowPolicy {
    pub dir: String,
    pub required_count: u32,
    pub enforce_extension: bool,
    pub severity: Severity,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        WorkflowPolicy {
            dir: ".github/workflows".to_string(),
            required_count: 1,
            enforce_extension: true,
            severity: Severity::High,
        }
    }
}

/// Shape declaration for one recognized structured document.
#[derive(Clone, Debug)]
pub struct DocumentPolicy {
    pub path: String,
    pub kind: String,
    pub required_keys: Vec<String>,
    /// Key whose value must be a well-formed semantic version string.
    pub version_key: Option<String>,
}

impl EffectivePolicy {
    /// An empty policy: no rules at all. Useful as a test starting point;
    /// registry construction rejects it (an empty registry is invalid).
    pub fn empty(profile: &str) -> Self {
        EffectivePolicy {
            profile: profile.to_string(),
            fail_threshold: Severity::High,
            max_violations: 500,
            required_files: Vec::new(),
            required_directories: Vec::new(),
            forbidden_directories: Vec::new(),
            banned_languages: Vec::new(),
            banned_package_managers: Vec::new(),
            workflows: WorkflowPolicy {
                required_count: 0,
                enforce_extension: false,
                ..WorkflowPolicy::default()
            },
            documents: Vec::new(),
            schema_severity: Severity::High,
            disabled_rules: BTreeSet::new(),
            severity_overrides: BTreeMap::new(),
        }
    }

    pub fn document_for(&self, path: &str) -> Option<&DocumentPolicy> {
        self.documents.iter().find(|d| d.path == path)
    }
}
