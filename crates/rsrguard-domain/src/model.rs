use rsrguard_types::RepoPath;
use std::collections::BTreeMap;

/// A read-only view of one repository's file tree at scan time.
///
/// Entries are sorted by path and immutable for the duration of a scan. The
/// model is built fresh per invocation and discarded with the report; it is
/// never cached across scans.
#[derive(Clone, Debug, Default)]
pub struct SnapshotModel {
    pub repo_root: RepoPath,

    /// All files and directories in the tree (sorted by path).
    pub entries: Vec<SnapshotEntry>,

    /// Parse outcomes for the recognized structured documents that were
    /// present in the tree. Absent documents do not appear here.
    pub documents: Vec<DocumentOutcome>,
}

#[derive(Clone, Debug)]
pub struct SnapshotEntry {
    pub path: RepoPath,
    pub kind: EntryKind,
    pub size: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

/// Result of parsing one recognized structured document.
///
/// Parse failure is data, not an error: it degrades to a single critical
/// schema violation for that file and never aborts the scan.
#[derive(Clone, Debug)]
pub struct DocumentOutcome {
    pub path: RepoPath,
    pub expected_kind: String,
    pub parsed: Result<StructuredDocument, ParseFailure>,
}

/// Typed view of a parsed metadata document: `(kind (key value...) ...)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructuredDocument {
    pub kind: String,
    pub entries: BTreeMap<String, ScmValue>,
}

/// A parsed S-expression value.
#[derive(Clone, Debug, PartialEq)]
pub enum ScmValue {
    Symbol(String),
    Str(String),
    Int(i64),
    List(Vec<ScmValue>),
}

impl ScmValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScmValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ScmValue::Symbol(_) => "symbol",
            ScmValue::Str(_) => "string",
            ScmValue::Int(_) => "integer",
            ScmValue::List(_) => "list",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFailure {
    pub line: u32,
    pub message: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl SnapshotModel {
    pub fn files(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::File)
    }

    /// Exact-path lookup. Entries are sorted, so this is a binary search.
    pub fn entry(&self, path: &str) -> Option<&SnapshotEntry> {
        self.entries
            .binary_search_by(|e| e.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn contains_file(&self, path: &str) -> bool {
        matches!(self.entry(path), Some(e) if e.kind == EntryKind::File)
    }

    /// True if `dir` exists: either as a directory entry or implied by any
    /// entry nested under it.
    pub fn has_directory(&self, dir: &str) -> bool {
        if matches!(self.entry(dir), Some(e) if e.kind == EntryKind::Dir) {
            return true;
        }
        self.entries.iter().any(|e| e.path.is_under(dir))
    }

    /// Files strictly inside `dir` (at any depth).
    pub fn files_under<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a SnapshotEntry> {
        self.files().filter(move |e| e.path.is_under(dir))
    }
}
