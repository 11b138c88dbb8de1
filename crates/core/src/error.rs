//! Error types for routine tracing
//!
//! [`TraceError`] is the canonical error of an invocation. Each variant names
//! the stage that failed and is terminal for the current call.
//!
//! ## Error Codes (Canonical)
//!
//! | Code | Stage | Description |
//! |------|-------|-------------|
//! | ParseError | parse | Malformed call syntax |
//! | ResolutionError | resolve | No unique routine for name + arity |
//! | ArgumentTypeError | coerce | Parameter type has no literal parser |
//! | LiteralConversionError | coerce | Literal text invalid for its type |
//! | ArityError | coerce | Argument count differs from declared parameters |
//! | InvocationError | invoke | The routine itself failed |
//! | NullResultError | invoke | The routine produced no value |
//!
//! ## Wire Format
//!
//! Errors encode to JSON as:
//! ```json
//! {
//!   "code": "LiteralConversionError",
//!   "message": "invalid input syntax for type int4: \"abc\"",
//!   "details": {"type_name": "int4", "literal": "abc"}
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Result type for tracing operations
pub type Result<T> = std::result::Result<T, TraceError>;

/// All errors an invocation can surface
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TraceError {
    /// Malformed call syntax (missing delimiter, bad routine name)
    #[error("invalid call syntax: {message}")]
    Parse {
        /// What was wrong with the input
        message: String,
    },

    /// No routine, or more than one, matches the name and arity
    #[error("{message}")]
    Resolution {
        /// Routine name as written by the caller
        routine: String,
        /// Number of arguments supplied
        arity: usize,
        /// Human-readable reason
        message: String,
    },

    /// Declared parameter type has no literal-parsing routine
    #[error("no input function available for type {type_name} (argument {position})")]
    ArgumentType {
        /// 1-based argument position
        position: usize,
        /// Name of the parameter type
        type_name: String,
    },

    /// Literal text is not valid for its declared type
    #[error("invalid input syntax for type {type_name}: \"{literal}\"")]
    LiteralConversion {
        /// Name of the parameter type
        type_name: String,
        /// Offending literal text
        literal: String,
        /// Reason reported by the type's parser
        reason: String,
    },

    /// Argument count differs from the routine's declared parameters
    #[error("wrong number of arguments for {routine}: got {actual}, expected {expected}")]
    Arity {
        /// Routine name
        routine: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// The routine failed while executing
    #[error("execution of {routine} failed: {message}")]
    Invocation {
        /// Routine name
        routine: String,
        /// Failure reported by the host
        message: String,
    },

    /// The routine returned no value
    #[error("{routine} returned no value")]
    NullResult {
        /// Routine name
        routine: String,
    },
}

impl TraceError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        TraceError::Parse {
            message: message.into(),
        }
    }

    /// Get the canonical error code
    pub fn error_code(&self) -> &'static str {
        match self {
            TraceError::Parse { .. } => "ParseError",
            TraceError::Resolution { .. } => "ResolutionError",
            TraceError::ArgumentType { .. } => "ArgumentTypeError",
            TraceError::LiteralConversion { .. } => "LiteralConversionError",
            TraceError::Arity { .. } => "ArityError",
            TraceError::Invocation { .. } => "InvocationError",
            TraceError::NullResult { .. } => "NullResultError",
        }
    }

    /// Name of the pipeline stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            TraceError::Parse { .. } => "parse",
            TraceError::Resolution { .. } => "resolve",
            TraceError::ArgumentType { .. }
            | TraceError::LiteralConversion { .. }
            | TraceError::Arity { .. } => "coerce",
            TraceError::Invocation { .. } | TraceError::NullResult { .. } => "invoke",
        }
    }

    /// Convert to wire error format
    pub fn to_wire_error(&self) -> WireError {
        WireError {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            TraceError::Parse { .. } => None,
            TraceError::Resolution { routine, arity, .. } => {
                Some(json!({"routine": routine, "arity": arity}))
            }
            TraceError::ArgumentType {
                position,
                type_name,
            } => Some(json!({"position": position, "type_name": type_name})),
            TraceError::LiteralConversion {
                type_name,
                literal,
                reason,
            } => Some(json!({"type_name": type_name, "literal": literal, "reason": reason})),
            TraceError::Arity {
                routine,
                expected,
                actual,
            } => Some(json!({"routine": routine, "expected": expected, "actual": actual})),
            TraceError::Invocation { routine, .. } | TraceError::NullResult { routine } => {
                Some(json!({"routine": routine}))
            }
        }
    }
}

/// Wire error representation for JSON encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    /// The canonical error code (e.g., "ParseError")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details
    pub details: Option<serde_json::Value>,
}

impl WireError {
    /// Encode as a JSON string
    pub fn to_json(&self) -> String {
        // A struct of strings and JSON values always serializes
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"{}","message":null,"details":null}}"#, self.code)
        })
    }
}

/// Failure reported by a host collaborator
///
/// Hosts raise this from statement execution or routine bodies; the engine
/// re-signals it as [`TraceError::Invocation`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Create a host error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Result type for host collaborators
pub type HostResult<T> = std::result::Result<T, HostError>;
