//! Host collaborator interfaces
//!
//! The engine never touches storage, planning, or execution directly. It
//! talks to its host through four narrow traits:
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`RoutineCatalog`] | name + arity → routine descriptors |
//! | [`TypeCatalog`] | type id → name and literal parser |
//! | [`ExecutionPipeline`] | the two wrappable hook slots, their trace lock, default behaviors |
//! | [`RoutineInvoker`] | positional invocation of a routine |
//!
//! Anything implementing all four is a [`Host`]. [`MemoryHost`] is an
//! in-memory implementation used by tests and embedders.

pub mod literal;
pub mod memory;

pub use memory::{MemoryHost, RoutineBody};

use parking_lot::ReentrantMutex;
use proctrace_core::{HostResult, QualifiedName, RoutineDescriptor, Statement, TypeId, Value};
use std::fmt;
use std::sync::Arc;

/// Literal-parsing routine of a type
///
/// Receives the raw literal text and returns the typed value, or a reason
/// the text is not a valid literal of the type.
pub type InputParser = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Name/arity resolution service
pub trait RoutineCatalog {
    /// Every routine matching `name` with exactly `arity` parameters
    ///
    /// Unqualified names are resolved against the host's schema search
    /// path. An empty vector means no routine matches.
    fn candidates(&self, name: &QualifiedName, arity: usize) -> Vec<RoutineDescriptor>;
}

/// Type catalog
pub trait TypeCatalog {
    /// Display name of a type, for error messages
    fn type_name(&self, ty: TypeId) -> String;

    /// Literal parser of a type, or `None` if the type has none
    fn input_parser(&self, ty: TypeId) -> Option<InputParser>;
}

/// Default statement behavior of the pipeline
///
/// Interceptors receive this to fall through to the host's own start/run
/// handling when there is no previous interceptor to delegate to.
pub trait StatementExecutor {
    /// Default start-of-statement behavior
    fn standard_start(&self, statement: &Statement) -> HostResult<()>;

    /// Default run-of-statement behavior, returning rows processed
    fn standard_run(&self, statement: &Statement) -> HostResult<u64>;
}

/// Interceptor installed on the start-of-statement extension point
pub type StartHook = Arc<dyn Fn(&dyn StatementExecutor, &Statement) -> HostResult<()> + Send + Sync>;

/// Interceptor installed on the run-of-statement extension point
pub type RunHook = Arc<dyn Fn(&dyn StatementExecutor, &Statement) -> HostResult<u64> + Send + Sync>;

/// Wrap a closure as a [`StartHook`]
pub fn start_hook<F>(f: F) -> StartHook
where
    F: Fn(&dyn StatementExecutor, &Statement) -> HostResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`RunHook`]
pub fn run_hook<F>(f: F) -> RunHook
where
    F: Fn(&dyn StatementExecutor, &Statement) -> HostResult<u64> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The pipeline's two hook slots
///
/// Each slot is either empty (the pipeline uses its default behavior) or
/// holds an interceptor. Cloning a chain clones the `Arc`s, so a saved chain
/// can be compared against the live one with [`HookChain::same_as`].
#[derive(Clone, Default)]
pub struct HookChain {
    /// On-start slot
    pub start: Option<StartHook>,
    /// On-run slot
    pub run: Option<RunHook>,
}

impl HookChain {
    /// A chain with both slots empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether both slots are empty
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.run.is_none()
    }

    /// Check whether both slots hold the same interceptors as `other`
    pub fn same_as(&self, other: &HookChain) -> bool {
        let start = match (&self.start, &other.start) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        let run = match (&self.run, &other.run) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        start && run
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("start", &self.start.is_some())
            .field("run", &self.run.is_some())
            .finish()
    }
}

/// Statement-execution pipeline with wrappable start/run extension points
pub trait ExecutionPipeline: StatementExecutor {
    /// Currently installed interceptors
    fn hooks(&self) -> HookChain;

    /// Replace both hook slots
    fn set_hooks(&self, hooks: HookChain);

    /// Lock held for the whole of a trace
    ///
    /// The hook slots are shared by every engine built on this pipeline, so
    /// the lock lives here rather than in any one engine. It is re-entrant:
    /// a routine may start a nested trace on the same thread.
    fn trace_lock(&self) -> &ReentrantMutex<()>;
}

/// Routine invocation facility
pub trait RoutineInvoker {
    /// Execute a routine with positional typed arguments
    ///
    /// Returns the routine's result; [`Value::Null`] means the routine
    /// produced no value.
    fn invoke(&self, routine: &RoutineDescriptor, args: Vec<Value>) -> HostResult<Value>;
}

/// Everything the engine needs from its environment
pub trait Host: RoutineCatalog + TypeCatalog + ExecutionPipeline + RoutineInvoker {}

impl<T> Host for T where T: RoutineCatalog + TypeCatalog + ExecutionPipeline + RoutineInvoker + ?Sized {}
