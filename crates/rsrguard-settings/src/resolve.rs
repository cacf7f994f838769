use crate::{model::PolicyConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use rsrguard_domain::policy::{
    DirectoryPolicy, DocumentPolicy, EffectivePolicy, PathPatternKind, RequiredFilePolicy,
};
use rsrguard_types::Severity;

/// CLI-level overrides, applied last.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_threshold: Option<String>,
    pub max_violations: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedPolicy {
    pub effective: EffectivePolicy,
}

pub fn resolve_policy(cfg: PolicyConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedPolicy> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "rhodium".to_string());

    let mut effective = presets::preset(&profile);

    if let Some(threshold) = overrides.fail_threshold.as_deref().or(cfg.fail_threshold.as_deref()) {
        effective.fail_threshold = parse_severity(threshold).context("invalid fail_threshold")?;
    }
    if let Some(mv) = overrides.max_violations.or(cfg.max_violations) {
        effective.max_violations = mv as usize;
    }

    if !cfg.required_files.is_empty() {
        effective.required_files = cfg
            .required_files
            .iter()
            .map(|rf| {
                let kind = match rf.kind.as_deref() {
                    None | Some("file") => PathPatternKind::File,
                    Some("directory") => PathPatternKind::Directory,
                    Some(other) => anyhow::bail!(
                        "unknown kind for {}: {other} (expected 'file' or 'directory')",
                        rf.id
                    ),
                };
                validate_pattern(&rf.id, &rf.pattern)?;
                Ok(RequiredFilePolicy {
                    rule_id: rf.id.clone(),
                    pattern: rf.pattern.clone(),
                    kind,
                    severity: severity_or(rf.severity.as_deref(), Severity::High)?,
                    description: rf.description.clone().unwrap_or_else(|| rf.pattern.clone()),
                    remediation: rf
                        .remediation
                        .clone()
                        .unwrap_or_else(|| format!("Add {}.", rf.pattern)),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
    }

    if !cfg.required_directories.is_empty() {
        effective.required_directories = directories(&cfg.required_directories)?;
    }
    if !cfg.forbidden_directories.is_empty() {
        effective.forbidden_directories = directories(&cfg.forbidden_directories)?;
    }

    if let Some(tags) = cfg.banned_languages {
        effective.banned_languages = tags;
    }
    if let Some(tags) = cfg.banned_package_managers {
        effective.banned_package_managers = tags;
    }

    if let Some(wf) = cfg.workflows {
        if let Some(dir) = wf.dir {
            effective.workflows.dir = dir;
        }
        if let Some(count) = wf.required_count {
            effective.workflows.required_count = count;
        }
        if let Some(enforce) = wf.enforce_extension {
            effective.workflows.enforce_extension = enforce;
        }
        if let Some(sev) = wf.severity.as_deref() {
            effective.workflows.severity =
                parse_severity(sev).context("invalid workflows.severity")?;
        }
    }

    if !cfg.documents.is_empty() {
        effective.documents = cfg
            .documents
            .into_iter()
            .map(|d| DocumentPolicy {
                path: d.path,
                kind: d.kind,
                required_keys: d.required_keys,
                version_key: d.version_key,
            })
            .collect();
    }

    for (rule_id, rule_override) in cfg.rules.iter() {
        if rule_override.enabled == Some(false) {
            effective.disabled_rules.insert(rule_id.clone());
        }
        if let Some(sev) = rule_override.severity.as_deref() {
            let severity = parse_severity(sev)
                .with_context(|| format!("invalid severity for {rule_id}"))?;
            effective.severity_overrides.insert(rule_id.clone(), severity);
        }
    }

    Ok(ResolvedPolicy { effective })
}

fn directories(cfgs: &[crate::model::DirectoryConfig]) -> anyhow::Result<Vec<DirectoryPolicy>> {
    cfgs.iter()
        .map(|d| {
            Ok(DirectoryPolicy {
                rule_id: d.id.clone(),
                path: d.path.clone(),
                severity: severity_or(d.severity.as_deref(), Severity::High)?,
                description: d.description.clone().unwrap_or_else(|| d.path.clone()),
                remediation: d
                    .remediation
                    .clone()
                    .unwrap_or_else(|| format!("Adjust the {} directory.", d.path)),
            })
        })
        .collect()
}

fn validate_pattern(rule_id: &str, pattern: &str) -> anyhow::Result<()> {
    Glob::new(pattern).with_context(|| format!("invalid pattern for {rule_id}: {pattern}"))?;
    Ok(())
}

fn severity_or(value: Option<&str>, default: Severity) -> anyhow::Result<Severity> {
    match value {
        None => Ok(default),
        Some(v) => parse_severity(v),
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "critical" => Ok(Severity::Critical),
        "high" => Ok(Severity::High),
        "medium" => Ok(Severity::Medium),
        "low" => Ok(Severity::Low),
        other => anyhow::bail!("unknown severity: {other} (expected critical|high|medium|low)"),
    }
}
