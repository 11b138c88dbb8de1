//! Statement trace collector
//!
//! Installs interceptors on a pipeline's start and run extension points for
//! the lifetime of a [`CollectorGuard`]:
//!
//! ```text
//! 1. install()        - save current HookChain, install tracing interceptors
//! 2. on-start         - record entry (if text), delegate to previous or default
//! 3. on-run           - delegate to previous or default, record nothing
//! 4. drop(guard)      - restore saved HookChain, drain log, clear routine
//! ```
//!
//! Step 4 runs exactly once on every exit path, including unwinding. Log
//! and active-routine state live in a per-call [`TraceContext`] captured by
//! the interceptors, never in process-wide statics.

use crate::host::{run_hook, start_hook, ExecutionPipeline, HookChain, RunHook, StartHook};
use crate::log::{TraceEntry, TraceLog};
use chrono::Utc;
use parking_lot::Mutex;
use proctrace_core::TraceId;
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-invocation trace state
///
/// Shared between the invocation engine and the installed interceptors.
#[derive(Debug)]
pub struct TraceContext {
    trace_id: TraceId,
    unknown_label: String,
    log: Mutex<TraceLog>,
    active_routine: Mutex<Option<String>>,
}

impl TraceContext {
    /// Create an empty context
    ///
    /// `unknown_label` names entries captured while no routine is active.
    pub fn new(trace_id: TraceId, unknown_label: impl Into<String>) -> Self {
        Self {
            trace_id,
            unknown_label: unknown_label.into(),
            log: Mutex::new(TraceLog::new()),
            active_routine: Mutex::new(None),
        }
    }

    /// Id of the invocation this context belongs to
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Name the routine under trace
    pub fn set_active_routine(&self, name: impl Into<String>) {
        *self.active_routine.lock() = Some(name.into());
    }

    /// Routine under trace, if any
    pub fn active_routine(&self) -> Option<String> {
        self.active_routine.lock().clone()
    }

    /// Record the start of a statement
    pub fn record(&self, statement_text: &str) {
        let routine = self
            .active_routine
            .lock()
            .clone()
            .unwrap_or_else(|| self.unknown_label.clone());
        trace!(trace_id = %self.trace_id, routine = %routine, statement = statement_text, "statement started");
        self.log
            .lock()
            .prepend(TraceEntry::new(routine, statement_text, Utc::now()));
    }

    /// Number of captured entries
    pub fn log_len(&self) -> usize {
        self.log.lock().len()
    }

    /// Copy of the captured entries
    pub fn snapshot(&self) -> TraceLog {
        self.log.lock().clone()
    }

    /// Drain the log and forget the active routine
    ///
    /// Returns the number of entries released.
    pub fn reset(&self) -> usize {
        *self.active_routine.lock() = None;
        self.log.lock().drain()
    }
}

/// Installs tracing interceptors on an execution pipeline
pub struct TraceCollector;

impl TraceCollector {
    /// Save the pipeline's hooks and install tracing interceptors
    ///
    /// The previous interceptors stay reachable: the new ones delegate to
    /// them. Dropping the returned guard restores them.
    pub fn install<P>(pipeline: &P, context: Arc<TraceContext>) -> CollectorGuard<'_, P>
    where
        P: ExecutionPipeline + ?Sized,
    {
        let previous = pipeline.hooks();
        pipeline.set_hooks(HookChain {
            start: Some(start_interceptor(Arc::clone(&context), previous.start.clone())),
            run: Some(run_interceptor(previous.run.clone())),
        });
        debug!(
            trace_id = %context.trace_id(),
            chained_start = previous.start.is_some(),
            chained_run = previous.run.is_some(),
            "trace hooks installed"
        );

        CollectorGuard {
            pipeline,
            previous,
            context,
        }
    }
}

fn start_interceptor(context: Arc<TraceContext>, previous: Option<StartHook>) -> StartHook {
    start_hook(move |executor, statement| {
        if let Some(text) = statement.text() {
            context.record(text);
        }
        match &previous {
            Some(hook) => hook(executor, statement),
            None => executor.standard_start(statement),
        }
    })
}

fn run_interceptor(previous: Option<RunHook>) -> RunHook {
    run_hook(move |executor, statement| match &previous {
        Some(hook) => hook(executor, statement),
        None => executor.standard_run(statement),
    })
}

/// Scope during which tracing interceptors are installed
///
/// Dropping the guard restores the saved hooks, drains the log, and clears
/// the active routine.
pub struct CollectorGuard<'p, P: ExecutionPipeline + ?Sized> {
    pipeline: &'p P,
    previous: HookChain,
    context: Arc<TraceContext>,
}

impl<'p, P: ExecutionPipeline + ?Sized> CollectorGuard<'p, P> {
    /// Context the installed interceptors record into
    pub fn context(&self) -> &Arc<TraceContext> {
        &self.context
    }

    /// Hooks that were installed before this guard, restored on drop
    pub fn previous(&self) -> &HookChain {
        &self.previous
    }
}

impl<'p, P: ExecutionPipeline + ?Sized> Drop for CollectorGuard<'p, P> {
    fn drop(&mut self) {
        self.pipeline.set_hooks(std::mem::take(&mut self.previous));
        let released = self.context.reset();
        debug!(
            trace_id = %self.context.trace_id(),
            released,
            "trace hooks restored"
        );
    }
}
