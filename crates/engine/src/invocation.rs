//! Invocation engine
//!
//! Orchestrates one traced call:
//!
//! ```text
//! 1. lock            - serialize with other traces on this host
//! 2. install         - fresh TraceContext, collector hooks installed
//! 3. parse           - CallExpression::parse
//! 4. resolve         - RoutineResolver (name + arity)
//! 5. label           - active routine = parsed call name
//! 6. coerce          - ArgumentCoercer, arity checked first
//! 7. invoke          - RoutineInvoker, errors and panics become Invocation
//! 8. check result    - Null is rejected
//! 9. render          - report built from the log
//! 10. cleanup        - guard dropped: hooks restored, log drained
//! ```
//!
//! Cleanup runs exactly once whichever step fails.
//!
//! # Thread Safety
//!
//! Hook slots belong to the host and are shared by every engine built on
//! it, so traces hold the host's re-entrant
//! [`trace_lock`](crate::host::ExecutionPipeline::trace_lock). Calls from
//! other threads queue, whichever engine they go through. A routine that
//! requests a trace of its own on the same thread re-enters the lock; the
//! inner collector chains to the outer one and restores it when the inner
//! trace ends.

use crate::coerce::ArgumentCoercer;
use crate::collector::{TraceCollector, TraceContext};
use crate::host::Host;
use crate::log::{TraceEntry, TraceLog};
use crate::options::TraceOptions;
use crate::parse::CallExpression;
use crate::report::ReportFormatter;
use crate::resolve::RoutineResolver;
use proctrace_core::{Result, TraceError, TraceId, Value};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// Structured result of a successful trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceReport {
    /// Id of the invocation
    pub trace_id: TraceId,
    /// Routine name as called
    pub routine: String,
    /// Value the routine returned
    pub result: Value,
    /// Captured entries, most recent first
    pub entries: Vec<TraceEntry>,
}

impl TraceReport {
    /// Number of captured entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the report as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

struct Traced {
    report: TraceReport,
    rendered: String,
}

/// Runs traced routine invocations against a host
pub struct InvocationEngine<H: Host + ?Sized> {
    host: Arc<H>,
    options: TraceOptions,
    formatter: ReportFormatter,
}

impl<H: Host + ?Sized> InvocationEngine<H> {
    /// Create an engine with default options
    pub fn new(host: Arc<H>) -> Self {
        Self::with_options(host, TraceOptions::default())
    }

    /// Create an engine with explicit options
    pub fn with_options(host: Arc<H>, options: TraceOptions) -> Self {
        let formatter = ReportFormatter::new(&options);
        Self {
            host,
            options,
            formatter,
        }
    }

    /// Host the engine runs against
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Options in effect
    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    /// Invoke `call` and return the rendered trace report
    ///
    /// # Errors
    ///
    /// Any [`TraceError`]; hooks and trace state are already cleaned up when
    /// the error is returned.
    pub fn trace(&self, call: &str) -> Result<String> {
        self.execute(call).map(|traced| traced.rendered)
    }

    /// Invoke `call` and return the structured trace report
    pub fn trace_report(&self, call: &str) -> Result<TraceReport> {
        self.execute(call).map(|traced| traced.report)
    }

    fn execute(&self, call: &str) -> Result<Traced> {
        let _serial = self.host.trace_lock().lock();
        let trace_id = TraceId::new();
        let span = info_span!("trace", trace_id = %trace_id, call);
        let _entered = span.enter();

        let context = Arc::new(TraceContext::new(trace_id, self.options.unknown_label.as_str()));
        let outcome = {
            let guard = TraceCollector::install(&*self.host, Arc::clone(&context));
            let outcome = self.run_traced(guard.context(), call);
            drop(guard);
            outcome
        };

        match &outcome {
            Ok(traced) => info!(
                routine = %traced.report.routine,
                entries = traced.report.len(),
                "trace complete"
            ),
            Err(e) => warn!(
                code = e.error_code(),
                stage = e.stage(),
                error = %e,
                "trace failed"
            ),
        }
        outcome
    }

    /// Steps between hook install and cleanup
    fn run_traced(&self, context: &Arc<TraceContext>, call: &str) -> Result<Traced> {
        let expression = CallExpression::parse(call)?;
        let descriptor =
            RoutineResolver::new(&*self.host).resolve(&expression.name, expression.arity())?;

        let routine = expression.name.to_string();
        context.set_active_routine(routine.as_str());

        let args = ArgumentCoercer::new(&*self.host).coerce_all(
            &descriptor,
            &routine,
            &expression.arguments,
        )?;
        if args.len() != descriptor.arity() {
            return Err(TraceError::Arity {
                routine,
                expected: descriptor.arity(),
                actual: args.len(),
            });
        }

        let host = &*self.host;
        let result = match catch_unwind(AssertUnwindSafe(|| host.invoke(&descriptor, args))) {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                return Err(TraceError::Invocation {
                    routine,
                    message: e.to_string(),
                })
            }
            Err(payload) => {
                return Err(TraceError::Invocation {
                    routine,
                    message: panic_message(payload.as_ref()),
                })
            }
        };

        if result.is_null() {
            return Err(TraceError::NullResult { routine });
        }

        let log: TraceLog = context.snapshot();
        let rendered = self.formatter.render(&log);
        Ok(Traced {
            report: TraceReport {
                trace_id: context.trace_id(),
                routine,
                result,
                entries: log.into_entries(),
            },
            rendered,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("routine panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("routine panicked: {}", s)
    } else {
        "routine panicked".to_string()
    }
}

impl<H: Host + ?Sized> std::fmt::Debug for InvocationEngine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationEngine")
            .field("options", &self.options)
            .finish()
    }
}
