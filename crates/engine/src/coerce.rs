//! Literal argument coercion
//!
//! Each raw token is parsed by the input routine of the parameter type it
//! lands on. Coercions are independent of one another; the only shared
//! check is the up-front arity comparison.

use crate::host::TypeCatalog;
use proctrace_core::{Result, RoutineDescriptor, TraceError, Value};

/// Converts raw literals into typed values using a [`TypeCatalog`]
pub struct ArgumentCoercer<'t, T: TypeCatalog + ?Sized> {
    types: &'t T,
}

impl<'t, T: TypeCatalog + ?Sized> ArgumentCoercer<'t, T> {
    /// Create a coercer over a type catalog
    pub fn new(types: &'t T) -> Self {
        Self { types }
    }

    /// Coerce every literal against the routine's parameters, in order
    ///
    /// The literal count is compared with the declared parameter count
    /// before any literal is parsed, so a mismatch is an arity error
    /// whatever the literals contain.
    ///
    /// # Errors
    ///
    /// - [`TraceError::Arity`] if the counts differ
    /// - [`TraceError::ArgumentType`] if a parameter type has no input routine
    /// - [`TraceError::LiteralConversion`] if a literal is invalid for its type
    pub fn coerce_all(
        &self,
        routine: &RoutineDescriptor,
        routine_label: &str,
        literals: &[String],
    ) -> Result<Vec<Value>> {
        if literals.len() != routine.arity() {
            return Err(TraceError::Arity {
                routine: routine_label.to_string(),
                expected: routine.arity(),
                actual: literals.len(),
            });
        }

        literals
            .iter()
            .enumerate()
            .map(|(position, literal)| self.coerce(routine, routine_label, position, literal))
            .collect()
    }

    /// Coerce the literal for parameter `position` (0-based)
    pub fn coerce(
        &self,
        routine: &RoutineDescriptor,
        routine_label: &str,
        position: usize,
        literal: &str,
    ) -> Result<Value> {
        let ty = routine
            .parameter_type(position)
            .ok_or_else(|| TraceError::Arity {
                routine: routine_label.to_string(),
                expected: routine.arity(),
                actual: position + 1,
            })?;

        let parser = self
            .types
            .input_parser(ty)
            .ok_or_else(|| TraceError::ArgumentType {
                position: position + 1,
                type_name: self.types.type_name(ty),
            })?;

        parser(literal).map_err(|reason| TraceError::LiteralConversion {
            type_name: self.types.type_name(ty),
            literal: literal.to_string(),
            reason,
        })
    }
}
