//! Use case orchestration for rsrguard.
//!
//! This crate provides the application layer: use cases that coordinate the
//! domain, repo, settings, and render layers. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod explain;
mod fleet;
mod render;
mod scan;

pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use fleet::{scan_fleet, FleetOptions, FleetOutcome, FleetTarget};
pub use render::{
    parse_report_json, render_annotations, render_markdown, render_text, serialize_report,
    to_renderable,
};
pub use scan::{
    report_exit_code, run_scan, run_scan_with_retries, run_scan_with_source, ScanError, ScanInput,
    ScanOutput, EXIT_ORCHESTRATION_FAILURE, EXIT_PASS, EXIT_VIOLATIONS,
};
