//! Routine invocation and statement tracing engine
//!
//! This crate turns a textual call such as `billing.close_month(2024, 3)` into
//! a traced routine invocation:
//! - [`parse`]: call string → qualified name + raw literals
//! - [`resolve`]: name + arity → routine descriptor
//! - [`coerce`]: literals → typed values via each type's input parser
//! - [`collector`]: start/run interceptors that record nested statements
//! - [`invocation`]: the orchestration with guaranteed cleanup
//! - [`report`]: text rendering of the captured log
//!
//! The engine talks to its environment through the traits in [`host`];
//! [`MemoryHost`] implements them in memory.

#![warn(clippy::all)]

pub mod coerce;
pub mod collector;
pub mod host;
pub mod invocation;
pub mod log;
pub mod options;
pub mod parse;
pub mod report;
pub mod resolve;

pub use coerce::ArgumentCoercer;
pub use collector::{CollectorGuard, TraceCollector, TraceContext};
pub use host::{
    ExecutionPipeline, HookChain, Host, InputParser, MemoryHost, RoutineCatalog, RoutineInvoker,
    StatementExecutor, TypeCatalog,
};
pub use invocation::{InvocationEngine, TraceReport};
pub use log::{TraceEntry, TraceLog};
pub use options::TraceOptions;
pub use parse::{ArgumentSplitter, CallExpression};
pub use report::ReportFormatter;
pub use resolve::RoutineResolver;
