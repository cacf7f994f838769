//! Policy config parsing and profile resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves policy
//! configuration provided as strings. The resolved policy and the registry
//! derived from it are loaded once per process and immutable afterwards;
//! picking up policy changes requires a restart, never a hot reload.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{
    DirectoryConfig, DocumentConfig, PolicyConfigV1, RequiredFileConfig, RuleOverride,
    WorkflowConfig,
};
pub use presets::preset;
pub use resolve::{Overrides, ResolvedPolicy};

/// Parse `rsr-policy.toml` (or equivalent) into a typed model.
pub fn parse_policy_toml(input: &str) -> anyhow::Result<PolicyConfigV1> {
    let cfg: PolicyConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective policy used by the engine (profile + file + CLI
/// overrides).
pub fn resolve_policy(cfg: PolicyConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedPolicy> {
    resolve::resolve_policy(cfg, overrides)
}
