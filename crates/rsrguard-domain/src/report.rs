use rsrguard_types::{ScanData, SeverityCounts, Violation};

/// The engine's output: pass verdict, ordered violations, counts, and scan
/// summary data. A pure function of snapshot + policy; no timestamps — the
/// application layer wraps this in the report envelope.
#[derive(Clone, Debug)]
pub struct DomainReport {
    pub pass: bool,
    pub violations: Vec<Violation>,
    pub counts: SeverityCounts,
    pub data: ScanData,
}
