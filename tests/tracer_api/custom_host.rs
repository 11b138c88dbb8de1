//! Custom Host Tests
//!
//! Hosts other than the bare in-memory one: a host that runs its own
//! catalog queries through the pipeline, and a type-erased host.

use crate::*;
use proctrace::host::{
    HookChain, Host, InputParser, RoutineCatalog, RoutineInvoker, StatementExecutor, TypeCatalog,
};
use parking_lot::ReentrantMutex;
use proctrace::{HostResult, QualifiedName, RoutineDescriptor, Statement, TypeId};
use std::sync::Arc;

/// Host whose catalog lookups execute a statement of their own
struct QueryingCatalogHost {
    inner: MemoryHost,
}

impl QueryingCatalogHost {
    fn new() -> Self {
        let inner = MemoryHost::new();
        install_fixture(&inner);
        Self { inner }
    }
}

impl RoutineCatalog for QueryingCatalogHost {
    fn candidates(&self, name: &QualifiedName, arity: usize) -> Vec<RoutineDescriptor> {
        // Lookup failures surface as "no candidates"
        if self
            .inner
            .execute(&format!("SELECT oid FROM pg_proc WHERE proname = '{}'", name.name()))
            .is_err()
        {
            return Vec::new();
        }
        self.inner.candidates(name, arity)
    }
}

impl TypeCatalog for QueryingCatalogHost {
    fn type_name(&self, ty: TypeId) -> String {
        self.inner.type_name(ty)
    }

    fn input_parser(&self, ty: TypeId) -> Option<InputParser> {
        self.inner.input_parser(ty)
    }
}

impl StatementExecutor for QueryingCatalogHost {
    fn standard_start(&self, statement: &Statement) -> HostResult<()> {
        self.inner.standard_start(statement)
    }

    fn standard_run(&self, statement: &Statement) -> HostResult<u64> {
        self.inner.standard_run(statement)
    }
}

impl ExecutionPipeline for QueryingCatalogHost {
    fn hooks(&self) -> HookChain {
        self.inner.hooks()
    }

    fn set_hooks(&self, hooks: HookChain) {
        self.inner.set_hooks(hooks)
    }

    fn trace_lock(&self) -> &ReentrantMutex<()> {
        self.inner.trace_lock()
    }
}

impl RoutineInvoker for QueryingCatalogHost {
    fn invoke(&self, routine: &RoutineDescriptor, args: Vec<Value>) -> HostResult<Value> {
        self.inner.invoke(routine, args)
    }
}

// =============================================================================
// STATEMENTS OUTSIDE ANY ROUTINE
// =============================================================================

#[test]
fn test_catalog_statements_use_unknown_label() {
    let tracer = Tracer::new(Arc::new(QueryingCatalogHost::new()));

    let report = tracer.trace_report("touch()").unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].routine_name(), "touch");
    assert_eq!(report.entries[1].routine_name(), "Unknown");
    assert_eq!(
        report.entries[1].statement_text(),
        "SELECT oid FROM pg_proc WHERE proname = 'touch'"
    );
}

#[test]
fn test_configured_unknown_label() {
    let tracer = Tracer::builder()
        .unknown_label("<catalog>")
        .build(Arc::new(QueryingCatalogHost::new()));

    let report = tracer.trace_report("touch()").unwrap();
    assert_eq!(report.entries[1].routine_name(), "<catalog>");
}

#[test]
fn test_resolution_failure_after_catalog_statement() {
    let tracer = Tracer::new(Arc::new(QueryingCatalogHost::new()));

    let err = tracer.trace("missing()").unwrap_err();
    assert_eq!(err.error_code(), "ResolutionError");
    assert!(tracer.host().hooks().is_empty());
    // The catalog statement still reached the default pipeline
    assert_eq!(
        tracer.host().inner.started_statements(),
        vec!["SELECT oid FROM pg_proc WHERE proname = 'missing'"]
    );
}

// =============================================================================
// TYPE-ERASED HOST
// =============================================================================

#[test]
fn test_dyn_host() {
    let memory = Arc::new(MemoryHost::new());
    install_fixture(&memory);
    let host: Arc<dyn Host> = memory.clone();

    let tracer = Tracer::new(host);
    let report = tracer.trace_report("two_steps(1)").unwrap();

    assert_eq!(statements(&report), vec!["S2", "S1"]);
    assert_eq!(memory.run_count(), 2);
    assert!(memory.hooks().is_empty());
}
