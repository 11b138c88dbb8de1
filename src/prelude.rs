//! Convenient imports for proctrace.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use proctrace::prelude::*;
//!
//! let tracer = Tracer::in_memory();
//! assert!(tracer.trace("missing()").is_err());
//! ```

// Main entry point
pub use crate::tracer::{Tracer, TracerBuilder};

// Error handling
pub use crate::types::{HostError, HostResult, Result, TraceError};

// Core types
pub use crate::types::{QualifiedName, TypeId, Value};

// Engine types
pub use crate::types::{MemoryHost, TraceOptions, TraceReport};

// Built-in type ids of the in-memory host
pub use proctrace_engine::host::literal::oid;
