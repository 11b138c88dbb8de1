//! In-memory host
//!
//! `MemoryHost` implements every host trait with plain in-process state:
//! - a routine catalog whose bodies are Rust closures
//! - a type catalog pre-populated with the built-in types
//! - a statement pipeline with the two hook slots
//!
//! Routine bodies receive the host and run statements through
//! [`MemoryHost::execute`], which passes each statement through the
//! start and run extension points exactly like a real executor would. This
//! is what makes nested activity visible to an installed tracer.
//!
//! # Example
//!
//! ```
//! use proctrace_engine::host::{literal::oid, MemoryHost};
//! use proctrace_core::Value;
//!
//! let host = MemoryHost::new();
//! host.create_routine("public.touch", &[oid::INT4], oid::INT4, |host, args| {
//!     host.execute("UPDATE counters SET n = n + 1")?;
//!     Ok(args[0].clone())
//! })
//! .unwrap();
//! ```

use super::literal::builtin_types;
use super::{
    ExecutionPipeline, HookChain, InputParser, RoutineCatalog, RoutineInvoker, StatementExecutor,
    TypeCatalog,
};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use proctrace_core::{
    HostError, HostResult, QualifiedName, RoutineDescriptor, RoutineId, Statement, TypeId, Value,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Body of a routine stored in a [`MemoryHost`]
pub type RoutineBody = Arc<dyn Fn(&MemoryHost, &[Value]) -> HostResult<Value> + Send + Sync>;

struct StoredRoutine {
    descriptor: RoutineDescriptor,
    body: RoutineBody,
}

struct StoredType {
    name: String,
    input: Option<InputParser>,
}

/// Host that keeps its catalog and pipeline in memory
pub struct MemoryHost {
    routines: RwLock<Vec<StoredRoutine>>,
    types: RwLock<HashMap<TypeId, StoredType>>,
    search_path: RwLock<Vec<String>>,
    hooks: Mutex<HookChain>,
    trace_lock: ReentrantMutex<()>,
    next_routine_id: AtomicU32,
    /// Statements the default start behavior accepted, in order
    started: Mutex<Vec<String>>,
    /// Number of times the default run behavior executed
    runs: AtomicU64,
}

impl MemoryHost {
    /// First id handed to a created routine
    pub const FIRST_ROUTINE_ID: u32 = 16384;

    /// Create a host with the built-in types and search path `public`
    pub fn new() -> Self {
        let types = builtin_types()
            .into_iter()
            .map(|(id, name, input)| {
                (
                    id,
                    StoredType {
                        name: name.to_string(),
                        input,
                    },
                )
            })
            .collect();

        Self {
            routines: RwLock::new(Vec::new()),
            types: RwLock::new(types),
            search_path: RwLock::new(vec!["public".to_string()]),
            hooks: Mutex::new(HookChain::empty()),
            trace_lock: ReentrantMutex::new(()),
            next_routine_id: AtomicU32::new(Self::FIRST_ROUTINE_ID),
            started: Mutex::new(Vec::new()),
            runs: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Catalog management
    // =========================================================================

    /// Register (or replace) a type
    ///
    /// A type registered without an input parser cannot be used for a
    /// parameter that receives a literal.
    pub fn register_type(&self, id: TypeId, name: impl Into<String>, input: Option<InputParser>) {
        self.types.write().insert(
            id,
            StoredType {
                name: name.into(),
                input,
            },
        );
    }

    /// Replace the schema search path used for unqualified names
    pub fn set_search_path(&self, schemas: Vec<String>) {
        *self.search_path.write() = schemas;
    }

    /// Current schema search path
    pub fn search_path(&self) -> Vec<String> {
        self.search_path.read().clone()
    }

    /// Create a routine
    ///
    /// Unqualified names are created in the first schema of the search path.
    /// Routines may be overloaded by parameter types; nothing prevents two
    /// routines with the same name and arity.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid qualified name or the search
    /// path is empty for an unqualified name.
    pub fn create_routine<F>(
        &self,
        name: &str,
        parameter_types: &[TypeId],
        return_type: TypeId,
        body: F,
    ) -> HostResult<RoutineId>
    where
        F: Fn(&MemoryHost, &[Value]) -> HostResult<Value> + Send + Sync + 'static,
    {
        let parsed = QualifiedName::parse(name).map_err(|e| HostError::new(e.to_string()))?;
        let qualified_name = if parsed.is_qualified() {
            parsed
        } else {
            let schema = self
                .search_path
                .read()
                .first()
                .cloned()
                .ok_or_else(|| HostError::new("no schema has been selected to create in"))?;
            parsed.in_schema(schema)
        };

        let id = RoutineId(self.next_routine_id.fetch_add(1, Ordering::SeqCst));
        self.routines.write().push(StoredRoutine {
            descriptor: RoutineDescriptor {
                id,
                qualified_name,
                parameter_types: parameter_types.to_vec(),
                return_type,
            },
            body: Arc::new(body),
        });
        Ok(id)
    }

    /// Number of routines in the catalog
    pub fn routine_count(&self) -> usize {
        self.routines.read().len()
    }

    // =========================================================================
    // Statement execution
    // =========================================================================

    /// Execute a statement through the pipeline
    ///
    /// Runs the start extension point (installed interceptor or default),
    /// then the run extension point, returning rows processed.
    pub fn execute(&self, sql: &str) -> HostResult<u64> {
        self.execute_statement(&Statement::new(sql))
    }

    /// Execute a prepared statement through the pipeline
    pub fn execute_statement(&self, statement: &Statement) -> HostResult<u64> {
        // Clone the slots so interceptors can re-enter the host
        let hooks = self.hooks.lock().clone();

        match &hooks.start {
            Some(hook) => hook(self, statement)?,
            None => self.standard_start(statement)?,
        }
        match &hooks.run {
            Some(hook) => hook(self, statement),
            None => self.standard_run(statement),
        }
    }

    /// Call another routine by name from inside a routine body
    ///
    /// Resolution uses the same name + arity rules as the catalog. The
    /// callee's statements pass through the pipeline as usual.
    pub fn call(&self, name: &str, args: Vec<Value>) -> HostResult<Value> {
        let parsed = QualifiedName::parse(name).map_err(|e| HostError::new(e.to_string()))?;
        let mut candidates = self.candidates(&parsed, args.len());
        match candidates.len() {
            0 => Err(HostError::new(format!(
                "function {} with {} argument(s) does not exist",
                parsed,
                args.len()
            ))),
            1 => {
                let descriptor = candidates.remove(0);
                self.invoke(&descriptor, args)
            }
            n => Err(HostError::new(format!(
                "function {} is not unique ({} candidates)",
                parsed, n
            ))),
        }
    }

    /// Statements the default start behavior has accepted, oldest first
    pub fn started_statements(&self) -> Vec<String> {
        self.started.lock().clone()
    }

    /// Number of statements the default run behavior has executed
    pub fn run_count(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    fn find_body(&self, id: RoutineId) -> Option<RoutineBody> {
        self.routines
            .read()
            .iter()
            .find(|r| r.descriptor.id == id)
            .map(|r| Arc::clone(&r.body))
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("routines", &self.routines.read().len())
            .field("types", &self.types.read().len())
            .field("search_path", &*self.search_path.read())
            .field("hooks", &*self.hooks.lock())
            .finish()
    }
}

impl RoutineCatalog for MemoryHost {
    fn candidates(&self, name: &QualifiedName, arity: usize) -> Vec<RoutineDescriptor> {
        let routines = self.routines.read();
        let matching = |target: &QualifiedName| -> Vec<RoutineDescriptor> {
            routines
                .iter()
                .filter(|r| &r.descriptor.qualified_name == target && r.descriptor.arity() == arity)
                .map(|r| r.descriptor.clone())
                .collect()
        };

        if name.is_qualified() {
            return matching(name);
        }

        // First schema on the path with any match wins
        for schema in self.search_path.read().iter() {
            let found = matching(&name.in_schema(schema.as_str()));
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

impl TypeCatalog for MemoryHost {
    fn type_name(&self, ty: TypeId) -> String {
        self.types
            .read()
            .get(&ty)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("type {}", ty))
    }

    fn input_parser(&self, ty: TypeId) -> Option<InputParser> {
        self.types.read().get(&ty).and_then(|t| t.input.clone())
    }
}

impl StatementExecutor for MemoryHost {
    fn standard_start(&self, statement: &Statement) -> HostResult<()> {
        match statement.text() {
            Some(text) if text.trim().is_empty() => {
                Err(HostError::new("syntax error: empty statement"))
            }
            Some(text) => {
                self.started.lock().push(text.to_string());
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn standard_run(&self, _statement: &Statement) -> HostResult<u64> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}

impl ExecutionPipeline for MemoryHost {
    fn hooks(&self) -> HookChain {
        self.hooks.lock().clone()
    }

    fn set_hooks(&self, hooks: HookChain) {
        *self.hooks.lock() = hooks;
    }

    fn trace_lock(&self) -> &ReentrantMutex<()> {
        &self.trace_lock
    }
}

impl RoutineInvoker for MemoryHost {
    fn invoke(&self, routine: &RoutineDescriptor, args: Vec<Value>) -> HostResult<Value> {
        let body = self
            .find_body(routine.id)
            .ok_or_else(|| HostError::new(format!("routine {} does not exist", routine.id)))?;
        body(self, &args)
    }
}
