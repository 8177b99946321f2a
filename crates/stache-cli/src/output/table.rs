//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};

/// Outcome of one conformance fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// Fixture data contains host-language code that cannot run here.
    Skipped,
}

/// Pass/fail counts for a single fixture suite.
pub struct SuiteSummary {
    /// Suite name (file stem, e.g. "sections").
    pub suite: String,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Format per-suite results as an ASCII table.
pub fn format_suite_table(summaries: &[SuiteSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Suite", "Passed", "Failed", "Skipped"]);

    for summary in summaries {
        table.add_row(vec![
            summary.suite.clone(),
            format!("{}/{}", summary.passed, summary.total()),
            summary.failed.to_string(),
            summary.skipped.to_string(),
        ]);
    }

    table
}
