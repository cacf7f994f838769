use crate::model::SnapshotModel;
use crate::policy::EffectivePolicy;
use crate::registry::RuleRegistry;
use rayon::prelude::*;
use rsrguard_types::Violation;

mod banned_patterns;
mod language_policy;
mod layout;
mod required_files;
mod structured_docs;

#[cfg(test)]
mod tests;

pub use language_policy::classify;

type Checker = fn(&SnapshotModel, &EffectivePolicy, &RuleRegistry, &mut Vec<Violation>);

/// The five checkers, one per rule category. Each is a pure, read-only
/// function of the same snapshot and policy; completion order is irrelevant
/// because the engine sorts before emitting.
const CHECKERS: [Checker; 5] = [
    required_files::run,
    structured_docs::run,
    layout::run,
    language_policy::run,
    banned_patterns::run,
];

pub fn run_all(
    model: &SnapshotModel,
    policy: &EffectivePolicy,
    registry: &RuleRegistry,
) -> Vec<Violation> {
    CHECKERS
        .par_iter()
        .map(|check| {
            let mut out = Vec::new();
            check(model, policy, registry, &mut out);
            out
        })
        .reduce(Vec::new, |mut acc, mut chunk| {
            acc.append(&mut chunk);
            acc
        })
}
