//! Routine descriptors and statements
//!
//! These are the shapes the host hands to the engine: a resolved routine
//! and a statement passing through the execution pipeline.

use crate::types::{QualifiedName, RoutineId, TypeId};
use serde::{Deserialize, Serialize};

/// A resolved stored routine
///
/// Obtained per call from the catalog and never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDescriptor {
    /// Catalog identifier
    pub id: RoutineId,
    /// Fully qualified name as stored in the catalog
    pub qualified_name: QualifiedName,
    /// Declared parameter types, in positional order
    pub parameter_types: Vec<TypeId>,
    /// Declared return type
    pub return_type: TypeId,
}

impl RoutineDescriptor {
    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    /// Declared type of the parameter at `position` (0-based)
    pub fn parameter_type(&self, position: usize) -> Option<TypeId> {
        self.parameter_types.get(position).copied()
    }
}

/// A statement passing through the execution pipeline
///
/// `source_text` is absent for statements the host builds internally
/// without SQL text; those are executed but never traced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Original statement text, if any
    pub source_text: Option<String>,
}

impl Statement {
    /// Create a statement from its source text
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: Some(source_text.into()),
        }
    }

    /// Create a statement that carries no source text
    pub fn without_text() -> Self {
        Self { source_text: None }
    }

    /// Source text, if any
    pub fn text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }
}
