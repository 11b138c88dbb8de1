//! Routine resolution by name and arity
//!
//! Argument types are not known until after resolution, so only the name
//! and the argument count take part in the lookup. Overloads that differ
//! only in parameter types are reported as ambiguous instead of guessed.

use crate::host::RoutineCatalog;
use proctrace_core::{QualifiedName, Result, RoutineDescriptor, TraceError};
use tracing::debug;

/// Resolves call names against a [`RoutineCatalog`]
pub struct RoutineResolver<'c, C: RoutineCatalog + ?Sized> {
    catalog: &'c C,
}

impl<'c, C: RoutineCatalog + ?Sized> RoutineResolver<'c, C> {
    /// Create a resolver over a catalog
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// Find the single routine named `name` taking `arity` arguments
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Resolution`] if no routine or more than one
    /// routine matches.
    pub fn resolve(&self, name: &QualifiedName, arity: usize) -> Result<RoutineDescriptor> {
        let mut candidates = self.catalog.candidates(name, arity);
        match candidates.len() {
            0 => Err(TraceError::Resolution {
                routine: name.to_string(),
                arity,
                message: format!(
                    "function {} with {} argument(s) does not exist",
                    name, arity
                ),
            }),
            1 => {
                let descriptor = candidates.remove(0);
                debug!(
                    routine = %name,
                    resolved = %descriptor.qualified_name,
                    id = %descriptor.id,
                    arity,
                    "routine resolved"
                );
                Ok(descriptor)
            }
            n => Err(TraceError::Resolution {
                routine: name.to_string(),
                arity,
                message: format!(
                    "function {} with {} argument(s) is not unique: {} candidates differ only by parameter type",
                    name, arity, n
                ),
            }),
        }
    }
}
