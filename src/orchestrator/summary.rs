//! Run summary for a single report.

use crate::alerts::ReportKind;
use crate::export::OutputFormat;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub kind: ReportKind,
    /// Number of output rows (CSV rows, not JSON objects).
    pub entries: usize,
    pub format: OutputFormat,
    pub elapsed: Duration,
    pub started_utc: chrono::DateTime<chrono::Utc>,
}

impl ReportSummary {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            entries: 0,
            format: OutputFormat::default(),
            elapsed: Duration::ZERO,
            started_utc: chrono::Utc::now(),
        }
    }

    pub fn with_entries(mut self, entries: usize) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the elapsed time; `started_utc` is moved back to match.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        if let Ok(d) = chrono::Duration::from_std(elapsed) {
            self.started_utc = chrono::Utc::now() - d;
        }
        self
    }
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} report: {} entries as {} in {:.3}s (started {})",
            self.kind,
            self.entries,
            self.format.as_str(),
            self.elapsed.as_secs_f64(),
            self.started_utc.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}
