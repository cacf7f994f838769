use crate::scm;
use crate::source::SnapshotSource;
use rsrguard_domain::model::{DocumentOutcome, ParseFailure, SnapshotEntry, SnapshotModel};
use rsrguard_domain::policy::EffectivePolicy;
use rsrguard_types::RepoPath;
use std::time::Instant;

/// Bounds on snapshot construction, supplied by the caller. On breach the
/// scan fails with an orchestration error rather than producing a partial
/// snapshot.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotLimits {
    pub deadline: Option<Instant>,
    pub max_entries: usize,
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        SnapshotLimits {
            deadline: None,
            max_entries: 100_000,
        }
    }
}

impl SnapshotLimits {
    pub fn with_deadline(deadline: Instant) -> Self {
        SnapshotLimits {
            deadline: Some(deadline),
            ..SnapshotLimits::default()
        }
    }

    pub fn check_deadline(&self) -> Result<(), SnapshotError> {
        match self.deadline {
            Some(deadline) if Instant::now() > deadline => Err(SnapshotError::Timeout),
            _ => Ok(()),
        }
    }
}

/// Snapshot construction failure. Distinct from a failing compliance report:
/// no report exists when construction fails.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("repository unreadable: {0}")]
    Io(#[source] anyhow::Error),

    #[error("snapshot construction exceeded its deadline")]
    Timeout,

    #[error("repository exceeds the snapshot entry limit ({limit})")]
    TooLarge { limit: usize },
}

impl SnapshotError {
    /// Only plain IO failures are worth a retry; a timeout or an oversized
    /// tree will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SnapshotError::Io(_))
    }
}

/// Build the immutable snapshot model for one scan: enumerate the tree, then
/// read and parse each recognized structured document that is present.
///
/// Document parse failures are captured as data in the model (they become
/// critical schema violations downstream); a read failure of a present
/// document is an IO error, because the snapshot itself is then unreliable.
pub fn build_snapshot(
    source: &dyn SnapshotSource,
    policy: &EffectivePolicy,
    limits: &SnapshotLimits,
) -> Result<SnapshotModel, SnapshotError> {
    let mut entries: Vec<SnapshotEntry> = source
        .entries(limits)?
        .into_iter()
        .map(|e| SnapshotEntry {
            path: e.path,
            kind: e.kind,
            size: e.size,
        })
        .collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.dedup_by(|a, b| a.path == b.path);

    let mut model = SnapshotModel {
        repo_root: RepoPath::new("."),
        entries,
        documents: Vec::new(),
    };

    for spec in &policy.documents {
        limits.check_deadline()?;
        if !model.contains_file(&spec.path) {
            continue;
        }
        let path = RepoPath::new(&spec.path);
        let text = source.read_to_string(&path).map_err(SnapshotError::Io)?;
        let parsed = scm::parse_document(&text).map_err(|e| ParseFailure {
            line: e.line,
            message: e.message,
        });
        model.documents.push(DocumentOutcome {
            path,
            expected_kind: spec.kind.clone(),
            parsed,
        });
    }

    // Documents follow policy order; normalize to path order for determinism
    // independent of policy file ordering.
    model.documents.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FsSource, MemorySource};
    use camino::Utf8Path;
    use rsrguard_domain::policy::DocumentPolicy;
    use std::time::Duration;
    use tempfile::TempDir;

    fn policy_with_state_doc() -> EffectivePolicy {
        let mut policy = EffectivePolicy::empty("test");
        policy.documents = vec![DocumentPolicy {
            path: "STATE.scm".to_string(),
            kind: "state".to_string(),
            required_keys: vec!["version".to_string()],
            version_key: Some("version".to_string()),
        }];
        policy
    }

    #[test]
    fn builds_sorted_entries_and_parses_present_documents() {
        let source = MemorySource::new()
            .with_file("src/lib.rs", "pub fn noop() {}\n")
            .with_file("STATE.scm", "(state (version \"1.0.0\"))\n")
            .with_file("README.adoc", "= readme\n");

        let model = build_snapshot(&source, &policy_with_state_doc(), &SnapshotLimits::default())
            .expect("snapshot");

        let paths: Vec<&str> = model.entries.iter().map(|e| e.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);

        assert_eq!(model.documents.len(), 1);
        let doc = model.documents[0].parsed.as_ref().expect("parsed");
        assert_eq!(doc.kind, "state");
        assert_eq!(doc.entries["version"].as_str(), Some("1.0.0"));
    }

    #[test]
    fn malformed_document_is_captured_not_fatal() {
        let source = MemorySource::new().with_file("STATE.scm", "(state (version \"1.0.0\"");

        let model = build_snapshot(&source, &policy_with_state_doc(), &SnapshotLimits::default())
            .expect("snapshot");
        assert_eq!(model.documents.len(), 1);
        assert!(model.documents[0].parsed.is_err());
    }

    #[test]
    fn absent_document_is_simply_not_recognized() {
        let source = MemorySource::new().with_file("README.adoc", "= readme\n");
        let model = build_snapshot(&source, &policy_with_state_doc(), &SnapshotLimits::default())
            .expect("snapshot");
        assert!(model.documents.is_empty());
    }

    #[test]
    fn entry_limit_fails_construction() {
        let source = MemorySource::new()
            .with_file("a.txt", "a")
            .with_file("b.txt", "b")
            .with_file("c.txt", "c");
        let limits = SnapshotLimits {
            deadline: None,
            max_entries: 2,
        };
        let err = build_snapshot(&source, &policy_with_state_doc(), &limits).unwrap_err();
        assert!(matches!(err, SnapshotError::TooLarge { limit: 2 }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn expired_deadline_times_out() {
        let source = MemorySource::new().with_file("a.txt", "a");
        let limits = SnapshotLimits::with_deadline(Instant::now() - Duration::from_millis(1));
        let err = build_snapshot(&source, &policy_with_state_doc(), &limits).unwrap_err();
        assert!(matches!(err, SnapshotError::Timeout));
        assert!(!err.is_retryable());
    }

    #[test]
    fn fs_source_walks_a_real_tree_and_skips_git() {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");

        std::fs::create_dir_all(root.join(".git/objects")).expect("mkdir");
        std::fs::create_dir_all(root.join("src")).expect("mkdir");
        std::fs::write(root.join(".git/config"), "[core]\n").expect("write");
        std::fs::write(root.join("src/lib.rs"), "pub fn noop() {}\n").expect("write");
        std::fs::write(root.join("STATE.scm"), "(state (version \"2.0.0\"))\n").expect("write");

        let source = FsSource::new(root);
        let model = build_snapshot(&source, &policy_with_state_doc(), &SnapshotLimits::default())
            .expect("snapshot");

        let paths: Vec<&str> = model.entries.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"src/lib.rs"));
        assert!(paths.contains(&"STATE.scm"));
        assert!(!paths.iter().any(|p| p.starts_with(".git")));
        assert_eq!(model.documents.len(), 1);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let source = FsSource::new(Utf8Path::new("/nonexistent/rsrguard/root"));
        let err = build_snapshot(&source, &policy_with_state_doc(), &SnapshotLimits::default())
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
        assert!(err.is_retryable());
    }
}
