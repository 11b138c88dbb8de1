//! Trace report rendering
//!
//! ```text
//! Routine Execution Trace Report
//! ==============================
//!
//! Entry #1:
//! ----------------
//! Routine: billing.close_month
//! Statement: UPDATE ledger SET closed = true
//! Executed at: 2024-03-01 12:00:00.000000 UTC
//!
//! Total entries: 1
//! ```
//!
//! An empty log renders the header followed by a single "no records" line.

use crate::log::{TraceEntry, TraceLog};
use crate::options::TraceOptions;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Line emitted instead of entries when nothing was captured
pub const NO_RECORDS: &str = "No execution records found";

/// Renders a [`TraceLog`] as text
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    header: String,
    timestamp_format: String,
}

impl ReportFormatter {
    /// Create a formatter from options
    pub fn new(options: &TraceOptions) -> Self {
        Self {
            header: options.header.clone(),
            timestamp_format: options.timestamp_format.clone(),
        }
    }

    /// Render the log, entries in log order (most recent first)
    pub fn render(&self, log: &TraceLog) -> String {
        let mut out = String::new();
        out.push_str(&self.header);
        out.push('\n');
        out.push_str(&"=".repeat(self.header.chars().count()));
        out.push_str("\n\n");

        if log.is_empty() {
            out.push_str(NO_RECORDS);
            out.push('\n');
            return out;
        }

        for (index, entry) in log.iter().enumerate() {
            self.render_entry(&mut out, index + 1, entry);
        }
        out.push_str(&format!("Total entries: {}\n", log.len()));
        out
    }

    fn render_entry(&self, out: &mut String, number: usize, entry: &TraceEntry) {
        out.push_str(&format!("Entry #{}:\n", number));
        out.push_str("----------------\n");
        out.push_str(&format!("Routine: {}\n", entry.routine_name()));
        out.push_str(&format!("Statement: {}\n", entry.statement_text()));
        out.push_str(&format!(
            "Executed at: {}\n",
            self.format_timestamp(entry.timestamp())
        ));
        out.push('\n');
    }

    /// Format a timestamp with the configured format
    ///
    /// Falls back to RFC 3339 if the format string is invalid.
    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        let mut formatted = String::new();
        match write!(formatted, "{}", at.format(&self.timestamp_format)) {
            Ok(()) => formatted,
            Err(_) => at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(&TraceOptions::default())
    }
}
