//! Trace entries and the trace log
//!
//! The log is ordered most-recently-captured first: every new entry is
//! prepended. Iteration, [`TraceLog::into_entries`], and the rendered report all
//! follow that order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One statement observed while a routine was under trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    routine_name: String,
    statement_text: String,
    timestamp: DateTime<Utc>,
}

impl TraceEntry {
    /// Create an entry
    pub fn new(
        routine_name: impl Into<String>,
        statement_text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            routine_name: routine_name.into(),
            statement_text: statement_text.into(),
            timestamp,
        }
    }

    /// Routine that was active when the statement started
    pub fn routine_name(&self) -> &str {
        &self.routine_name
    }

    /// Text of the statement
    pub fn statement_text(&self) -> &str {
        &self.statement_text
    }

    /// When the statement started
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Entries captured during one invocation, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    entries: VecDeque<TraceEntry>,
}

impl TraceLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry in front of every existing entry
    pub fn prepend(&mut self, entry: TraceEntry) {
        self.entries.push_front(entry);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&TraceEntry> {
        self.entries.front()
    }

    /// Entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter()
    }

    /// Remove every entry, returning how many were released
    pub fn drain(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        released
    }

    /// Consume the log into its entries, most recent first
    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries.into()
    }
}

impl<'a> IntoIterator for &'a TraceLog {
    type Item = &'a TraceEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
