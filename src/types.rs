//! Public types for the proctrace API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Values and identifiers
pub use proctrace_core::{SpecialFloatKind, Value};
pub use proctrace_core::{QualifiedName, RoutineId, TraceId, TypeId};

// Host-facing types
pub use proctrace_core::{RoutineDescriptor, Statement};

// Errors
pub use proctrace_core::{HostError, HostResult, Result, TraceError, WireError};

// Engine types
pub use proctrace_engine::{
    CallExpression, HookChain, Host, MemoryHost, TraceEntry, TraceLog, TraceOptions, TraceReport,
};
