//! Repository adapters: enumerate file trees and read the recognized
//! metadata documents into the snapshot model.
//!
//! This crate is allowed to do filesystem IO. The snapshot it produces is
//! read-only, built fresh per scan, and bounded by caller-supplied limits —
//! construction either completes within the limits or fails as an
//! orchestration error; a partial snapshot is never returned.

#![forbid(unsafe_code)]

pub mod scm;
mod snapshot;
mod source;

pub use snapshot::{build_snapshot, SnapshotError, SnapshotLimits};
pub use source::{FsSource, MemorySource, SnapshotSource, SourceEntry};
