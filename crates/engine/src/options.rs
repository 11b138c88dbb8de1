//! Options controlling labels and report rendering.

use serde::{Deserialize, Serialize};

/// Label for entries captured while no routine is active
pub const DEFAULT_UNKNOWN_LABEL: &str = "Unknown";

/// Default report header
pub const DEFAULT_HEADER: &str = "Routine Execution Trace Report";

/// Default `strftime` format for entry timestamps
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f UTC";

/// Options for tracing and reporting.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use proctrace_engine::TraceOptions;
///
/// let opts = TraceOptions::new()
///     .unknown_label("<no routine>")
///     .timestamp_format("%H:%M:%S");
/// assert_eq!(opts.unknown_label, "<no routine>");
/// ```
///
/// Options deserialize with defaults for missing fields, so they can be
/// embedded in a host's own configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Routine name recorded for statements run while no routine is active
    pub unknown_label: String,
    /// First line of the text report, underlined with `=`
    pub header: String,
    /// chrono `strftime` format for entry timestamps
    pub timestamp_format: String,
}

impl TraceOptions {
    /// Create options with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label for statements captured outside any routine.
    pub fn unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = label.into();
        self
    }

    /// Set the report header line.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the chrono `strftime` format used for timestamps.
    ///
    /// An invalid format falls back to RFC 3339 when rendering.
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
            header: DEFAULT_HEADER.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}
