use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - rule_id
/// - path (repo-relative, if present)
pub fn fingerprint_for(rule_id: &str, path: Option<&str>) -> String {
    let mut parts = vec![rule_id];
    if let Some(p) = path {
        parts.push(p);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
