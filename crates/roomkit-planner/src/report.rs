//! Apply report.
//!
//! Every pipeline stage records what it did here, so callers can surface
//! the outcome of a plan application without scraping logs. Diagnostics
//! carry operator-facing notices such as the legacy-vs-current furniture
//! contract violation.

use serde::Serialize;

/// Counters and diagnostics accumulated over one plan application.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub walls_created: usize,
    pub assets_created: usize,
    pub shapes_created: usize,
    pub entities_patched: usize,
    pub entities_removed: usize,
    pub entities_duplicated: usize,
    /// Entries that referenced nothing or failed validation; each one is a
    /// per-entry no-op, never a plan failure.
    pub entries_skipped: usize,
    /// Operator-facing notices collected along the way.
    pub diagnostics: Vec<String>,
}

impl ApplyReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an operator-facing diagnostic.
    pub fn diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    /// One-line summary for log output.
    pub fn summary(&self) -> String {
        format!(
            "{} walls, {} assets, {} shapes created; {} patched, {} removed, {} duplicated, {} skipped",
            self.walls_created,
            self.assets_created,
            self.shapes_created,
            self.entities_patched,
            self.entities_removed,
            self.entities_duplicated,
            self.entries_skipped,
        )
    }
}
