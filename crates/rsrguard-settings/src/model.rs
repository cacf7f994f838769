use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `rsr-policy.toml` schema v1.
///
/// This is a *user-facing* policy model: it is intentionally permissive so
/// forward-compat is easy. Anything absent falls back to the selected
/// profile's preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyConfigV1 {
    /// Optional schema string for tooling (`rsrguard.policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Severity at which a violation blocks `pass`: `critical`, `high`,
    /// `medium`, or `low`. Default `high`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_threshold: Option<String>,

    /// How many violations to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_violations: Option<u32>,

    /// Replaces the preset's required-file rules when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_files: Vec<RequiredFileConfig>,

    /// Replaces the preset's required-directory rules when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_directories: Vec<DirectoryConfig>,

    /// Replaces the preset's forbidden-directory rules when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_directories: Vec<DirectoryConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_languages: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_package_managers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<WorkflowConfig>,

    /// Replaces the preset's structured-document shapes when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentConfig>,

    /// Map of rule id -> override.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequiredFileConfig {
    /// Stable rule id, e.g. `files.readme`.
    pub id: String,
    /// Plain path or simple glob pattern.
    pub pattern: String,
    /// `file` (default) or `directory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DirectoryConfig {
    pub id: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_extension: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentConfig {
    pub path: String,
    /// Expected head symbol of the top-level form.
    pub kind: String,
    #[serde(default)]
    pub required_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_key: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleOverride {
    /// Disable the rule entirely (removes it from the registry).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override the rule's severity: `critical`, `high`, `medium`, `low`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
