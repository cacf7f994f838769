//! The rule registry: every compliance rule as a versioned, declarative
//! record.
//!
//! Rules are data, not code branches. Checkers mint violations exclusively
//! through [`RuleRegistry::violation`], which copies category, severity, and
//! remediation from the registry entry — so a violation referencing a rule
//! that does not exist is impossible by construction, and adding a rule is a
//! registry/policy change, not a checker change.

use crate::fingerprint::fingerprint_for;
use crate::policy::EffectivePolicy;
use rsrguard_types::{ids, RepoPath, RuleCategory, Severity, Violation};
use serde_json::Value as JsonValue;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct Rule {
    pub id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
}

#[derive(Clone, Debug, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Rule>,
}

/// Registry construction failure. This is an orchestration error: a scan
/// never starts against an empty or inconsistent registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    Empty,
    DuplicateRule(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Empty => write!(f, "rule registry is empty"),
            RegistryError::DuplicateRule(id) => write!(f, "duplicate rule id: {id}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl RuleRegistry {
    /// Build the registry from the resolved policy. Loaded once per process;
    /// immutable for the process lifetime.
    pub fn from_policy(policy: &EffectivePolicy) -> Result<RuleRegistry, RegistryError> {
        let mut registry = RuleRegistry::default();

        for rf in &policy.required_files {
            registry.insert(Rule {
                id: rf.rule_id.clone(),
                category: RuleCategory::RequiredFile,
                severity: rf.severity,
                description: rf.description.clone(),
                remediation: rf.remediation.clone(),
            })?;
        }

        for dir in &policy.required_directories {
            registry.insert(Rule {
                id: dir.rule_id.clone(),
                category: RuleCategory::Layout,
                severity: dir.severity,
                description: dir.description.clone(),
                remediation: dir.remediation.clone(),
            })?;
        }
        for dir in &policy.forbidden_directories {
            registry.insert(Rule {
                id: dir.rule_id.clone(),
                category: RuleCategory::Layout,
                severity: dir.severity,
                description: dir.description.clone(),
                remediation: dir.remediation.clone(),
            })?;
        }

        if policy.workflows.required_count > 0 {
            registry.insert(Rule {
                id: ids::RULE_LAYOUT_WORKFLOW_COUNT.to_string(),
                category: RuleCategory::Layout,
                severity: policy.workflows.severity,
                description: format!(
                    "{} must contain at least {} workflow file(s)",
                    policy.workflows.dir, policy.workflows.required_count
                ),
                remediation: format!("Add workflow files under {}.", policy.workflows.dir),
            })?;
        }
        if policy.workflows.enforce_extension {
            registry.insert(Rule {
                id: ids::RULE_LAYOUT_WORKFLOW_EXTENSION.to_string(),
                category: RuleCategory::Layout,
                severity: Severity::Medium,
                description: "workflow files must use a .yml or .yaml extension".to_string(),
                remediation: format!(
                    "Rename stray files under {} or move them elsewhere.",
                    policy.workflows.dir
                ),
            })?;
        }

        if !policy.documents.is_empty() {
            registry.insert_schema_rules(policy.schema_severity)?;
        }

        for tag in &policy.banned_languages {
            registry.insert(Rule {
                id: ids::banned_language_rule_id(tag),
                category: RuleCategory::LanguagePolicy,
                severity: Severity::High,
                description: format!("{tag} sources are not permitted"),
                remediation: format!("Port {tag} sources to an approved language or remove them."),
            })?;
        }
        for tag in &policy.banned_package_managers {
            registry.insert(Rule {
                id: ids::banned_manager_rule_id(tag),
                category: RuleCategory::BannedPattern,
                severity: Severity::High,
                description: format!("{tag} artifacts are not permitted"),
                remediation: format!("Remove the {tag} artifact and use the approved toolchain."),
            })?;
        }

        registry.rules.retain(|id, _| !policy.disabled_rules.contains(id));
        for (id, severity) in &policy.severity_overrides {
            if let Some(rule) = registry.rules.get_mut(id) {
                rule.severity = *severity;
            }
        }

        if registry.rules.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(registry)
    }

    fn insert_schema_rules(&mut self, shape_severity: Severity) -> Result<(), RegistryError> {
        let schema_rule = |id: &str, severity: Severity, description: &str, remediation: &str| Rule {
            id: id.to_string(),
            category: RuleCategory::Schema,
            severity,
            description: description.to_string(),
            remediation: remediation.to_string(),
        };

        // Parse errors are always critical: a malformed document blocks the
        // fleet bots that read it.
        self.insert(schema_rule(
            ids::RULE_SCHEMA_PARSE,
            Severity::Critical,
            "structured document must be well-formed",
            "Fix the syntax error at the reported line.",
        ))?;
        self.insert(schema_rule(
            ids::RULE_SCHEMA_KIND,
            shape_severity,
            "structured document must be headed by its declared kind",
            "Change the top-level form's head symbol to the expected kind.",
        ))?;
        self.insert(schema_rule(
            ids::RULE_SCHEMA_MISSING_KEY,
            shape_severity,
            "structured document must declare its required keys",
            "Add the missing (key value) entry.",
        ))?;
        self.insert(schema_rule(
            ids::RULE_SCHEMA_KEY_TYPE,
            shape_severity,
            "structured document keys must hold the declared value type",
            "Change the value to the declared type.",
        ))?;
        self.insert(schema_rule(
            ids::RULE_SCHEMA_VERSION,
            shape_severity,
            "version keys must hold a semantic version string",
            "Use MAJOR.MINOR.PATCH, e.g. \"1.0.0\".",
        ))
    }

    fn insert(&mut self, rule: Rule) -> Result<(), RegistryError> {
        match self.rules.entry(rule.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(rule);
                Ok(())
            }
            Entry::Occupied(existing) => {
                Err(RegistryError::DuplicateRule(existing.key().clone()))
            }
        }
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Mint a violation against a registered rule. Returns `None` when the
    /// rule is not in the registry (disabled or unknown), so checkers cannot
    /// produce orphan violations.
    pub fn violation(
        &self,
        rule_id: &str,
        path: Option<&RepoPath>,
        message: String,
    ) -> Option<Violation> {
        self.violation_with_data(rule_id, path, message, JsonValue::Null)
    }

    pub fn violation_with_data(
        &self,
        rule_id: &str,
        path: Option<&RepoPath>,
        message: String,
        data: JsonValue,
    ) -> Option<Violation> {
        let rule = self.rules.get(rule_id)?;
        Some(Violation {
            severity: rule.severity,
            rule_id: rule.id.clone(),
            category: rule.category,
            message,
            path: path.cloned(),
            remediation: Some(rule.remediation.clone()),
            fingerprint: Some(fingerprint_for(&rule.id, path.map(RepoPath::as_str))),
            data,
        })
    }
}
