use crate::snapshot::{SnapshotError, SnapshotLimits};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use rsrguard_domain::model::EntryKind;
use rsrguard_types::RepoPath;
use std::collections::BTreeMap;
use walkdir::WalkDir;

#[derive(Clone, Debug)]
pub struct SourceEntry {
    pub path: RepoPath,
    pub kind: EntryKind,
    pub size: u64,
}

/// Read access to a repository tree. The engine only needs paths and byte
/// content, not a specific transport: `FsSource` covers local checkouts,
/// `MemorySource` covers tests and API-backed virtual filesystems.
pub trait SnapshotSource {
    /// Enumerate every entry, enforcing the limits during the walk so an
    /// oversized or slow tree fails early instead of producing a partial
    /// snapshot.
    fn entries(&self, limits: &SnapshotLimits) -> Result<Vec<SourceEntry>, SnapshotError>;

    fn read_to_string(&self, path: &RepoPath) -> anyhow::Result<String>;
}

/// A local checkout rooted at a directory.
pub struct FsSource {
    root: Utf8PathBuf,
}

impl FsSource {
    pub fn new(root: &Utf8Path) -> Self {
        FsSource {
            root: root.to_owned(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl SnapshotSource for FsSource {
    fn entries(&self, limits: &SnapshotLimits) -> Result<Vec<SourceEntry>, SnapshotError> {
        if !self.root.is_dir() {
            return Err(SnapshotError::Io(anyhow::anyhow!(
                "repository root is not a readable directory: {}",
                self.root
            )));
        }

        let mut out = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
        {
            limits.check_deadline()?;

            let entry = entry
                .map_err(|e| SnapshotError::Io(anyhow::anyhow!("walk {}: {e}", self.root)))?;
            let Some(abs) = Utf8Path::from_path(entry.path()) else {
                // Non-UTF-8 names cannot appear in a compliant tree; skip
                // rather than abort the whole scan.
                continue;
            };
            let rel = abs.strip_prefix(&self.root).unwrap_or(abs);
            if rel.as_str().is_empty() {
                continue;
            }

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::File
            };
            let size = if kind == EntryKind::File {
                entry
                    .metadata()
                    .map_err(|e| SnapshotError::Io(anyhow::anyhow!("stat {rel}: {e}")))?
                    .len()
            } else {
                0
            };

            out.push(SourceEntry {
                path: RepoPath::new(rel.as_str()),
                kind,
                size,
            });
            if out.len() > limits.max_entries {
                return Err(SnapshotError::TooLarge {
                    limit: limits.max_entries,
                });
            }
        }
        Ok(out)
    }

    fn read_to_string(&self, path: &RepoPath) -> anyhow::Result<String> {
        let abs = self.root.join(path.as_str());
        std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))
    }
}

/// In-memory tree keyed by repo-relative path. Directories are synthesized
/// from file paths.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files
            .insert(RepoPath::new(path).as_str().to_string(), contents.to_string());
        self
    }
}

impl SnapshotSource for MemorySource {
    fn entries(&self, limits: &SnapshotLimits) -> Result<Vec<SourceEntry>, SnapshotError> {
        limits.check_deadline()?;

        let mut dirs: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
        for path in self.files.keys() {
            let mut idx = 0;
            while let Some(pos) = path[idx..].find('/') {
                let end = idx + pos;
                dirs.insert(path[..end].to_string());
                idx = end + 1;
            }
        }

        let mut out: Vec<SourceEntry> = dirs
            .into_iter()
            .map(|d| SourceEntry {
                path: RepoPath::new(d),
                kind: EntryKind::Dir,
                size: 0,
            })
            .collect();
        out.extend(self.files.iter().map(|(p, contents)| SourceEntry {
            path: RepoPath::new(p),
            kind: EntryKind::File,
            size: contents.len() as u64,
        }));

        if out.len() > limits.max_entries {
            return Err(SnapshotError::TooLarge {
                limit: limits.max_entries,
            });
        }
        Ok(out)
    }

    fn read_to_string(&self, path: &RepoPath) -> anyhow::Result<String> {
        self.files
            .get(path.as_str())
            .cloned()
            .with_context(|| format!("no such file: {path}"))
    }
}
