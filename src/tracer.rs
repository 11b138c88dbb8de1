//! Main entry point for proctrace.
//!
//! This module provides the `Tracer` struct, which runs traced routine
//! invocations against a host.

use proctrace_core::{Result, WireError};
use proctrace_engine::{Host, InvocationEngine, MemoryHost, TraceOptions, TraceReport};
use std::sync::Arc;
use tracing::debug;

/// The routine tracer.
///
/// Create a tracer using [`Tracer::new`], [`Tracer::in_memory`] or
/// [`Tracer::builder`].
///
/// # Example
///
/// ```
/// use proctrace::prelude::*;
///
/// let tracer = Tracer::in_memory();
/// tracer
///     .host()
///     .create_routine("touch", &[oid::INT4], oid::INT4, |host, args| {
///         host.execute("UPDATE counters SET n = n + 1")?;
///         Ok(args[0].clone())
///     })
///     .unwrap();
///
/// let report = tracer.trace("touch(1)").unwrap();
/// assert!(report.contains("Statement: UPDATE counters SET n = n + 1"));
/// ```
pub struct Tracer<H: Host + ?Sized = MemoryHost> {
    engine: InvocationEngine<H>,
}

impl Tracer<MemoryHost> {
    /// Create a tracer over a fresh in-memory host.
    ///
    /// The host starts with the built-in types and an empty routine
    /// catalog; add routines through [`Tracer::host`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryHost::new()))
    }

    /// Create a builder for tracer configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use proctrace::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let tracer = Tracer::builder()
    ///     .unknown_label("<none>")
    ///     .header("Audit Trace")
    ///     .build(Arc::new(MemoryHost::new()));
    /// assert_eq!(tracer.options().header, "Audit Trace");
    /// ```
    pub fn builder() -> TracerBuilder {
        TracerBuilder::new()
    }
}

impl<H: Host + ?Sized> Tracer<H> {
    /// Create a tracer over a host with default options.
    pub fn new(host: Arc<H>) -> Self {
        TracerBuilder::new().build(host)
    }

    /// Invoke a routine and return the rendered trace report.
    ///
    /// `call` has the form `name(arg1, arg2, ...)` or
    /// `schema.name(...)`. Arguments are literals parsed by each
    /// parameter type's input routine.
    ///
    /// # Errors
    ///
    /// A single [`TraceError`](proctrace_core::TraceError) naming the stage
    /// that failed. The host's hooks are restored before it is returned.
    pub fn trace(&self, call: &str) -> Result<String> {
        self.engine.trace(call)
    }

    /// Invoke a routine and return the structured trace report.
    pub fn trace_report(&self, call: &str) -> Result<TraceReport> {
        self.engine.trace_report(call)
    }

    /// Invoke a routine and encode the outcome as JSON.
    ///
    /// Success yields the serialized [`TraceReport`]; failure yields the
    /// error's wire form (`{code, message, details}`).
    pub fn trace_json(&self, call: &str) -> String {
        match self.engine.trace_report(call) {
            Ok(report) => report.to_json().unwrap_or_else(|e| {
                WireError {
                    code: "SerializationError".to_string(),
                    message: e.to_string(),
                    details: None,
                }
                .to_json()
            }),
            Err(e) => e.to_wire_error().to_json(),
        }
    }

    /// Get the host.
    pub fn host(&self) -> &Arc<H> {
        self.engine.host()
    }

    /// Get the options in effect.
    pub fn options(&self) -> &TraceOptions {
        self.engine.options()
    }
}

impl<H: Host + ?Sized> std::fmt::Debug for Tracer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer").field("engine", &self.engine).finish()
    }
}

/// Builder for tracer configuration.
///
/// # Example
///
/// ```
/// use proctrace::prelude::*;
///
/// let options = TraceOptions::new().timestamp_format("%H:%M:%S");
/// let tracer = Tracer::builder().options(options).build_in_memory();
/// assert_eq!(tracer.options().timestamp_format, "%H:%M:%S");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracerBuilder {
    options: TraceOptions,
}

impl TracerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    ///
    /// Useful when options come from a host's own configuration file.
    pub fn options(mut self, options: TraceOptions) -> Self {
        self.options = options;
        self
    }

    /// Label for statements captured while no routine is active.
    pub fn unknown_label(mut self, label: impl Into<String>) -> Self {
        self.options = self.options.unknown_label(label);
        self
    }

    /// Header line of the text report.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.options = self.options.header(header);
        self
    }

    /// chrono `strftime` format for entry timestamps.
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.options = self.options.timestamp_format(format);
        self
    }

    /// Build a tracer over the given host.
    pub fn build<H: Host + ?Sized>(self, host: Arc<H>) -> Tracer<H> {
        debug!(options = ?self.options, "tracer created");
        Tracer {
            engine: InvocationEngine::with_options(host, self.options),
        }
    }

    /// Build a tracer over a fresh in-memory host.
    pub fn build_in_memory(self) -> Tracer<MemoryHost> {
        self.build(Arc::new(MemoryHost::new()))
    }
}
