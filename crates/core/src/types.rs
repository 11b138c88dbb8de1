//! Core identifier types
//!
//! This module defines the fundamental types used throughout the system:
//! - [`TraceId`]: Unique identifier for one traced invocation
//! - [`RoutineId`]: Catalog identifier of a stored routine
//! - [`TypeId`]: Catalog identifier of a value type
//! - [`QualifiedName`]: Optionally schema-qualified routine name

use crate::error::{Result, TraceError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a traced invocation
///
/// Every call to the invocation engine gets a fresh TraceId. It labels the
/// structured log span and the structured report.
///
/// # Examples
///
/// ```
/// use proctrace_core::TraceId;
///
/// let a = TraceId::new();
/// let b = TraceId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Create a new random TraceId using UUID v4
    pub fn new() -> Self {
        TraceId(Uuid::new_v4())
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a stored routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoutineId(pub u32);

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A routine name, optionally prefixed by a schema
///
/// Parsing follows SQL identifier rules:
/// - Unquoted segments are trimmed and folded to lower case
/// - Double-quoted segments keep their case; `""` is an escaped quote
/// - Segments are separated by `.`; at most `schema.name`
///
/// Display re-quotes any segment that would not survive a re-parse
/// unquoted, so `QualifiedName::parse(&name.to_string())` is stable.
///
/// # Examples
///
/// ```
/// use proctrace_core::QualifiedName;
///
/// let name = QualifiedName::parse(" Audit.Log_Event ").unwrap();
/// assert_eq!(name.schema(), Some("audit"));
/// assert_eq!(name.name(), "log_event");
/// assert_eq!(name.to_string(), "audit.log_event");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Schema segment, if the name was qualified
    schema: Option<String>,
    /// Routine name segment
    name: String,
}

impl QualifiedName {
    /// Create a name from already-normalized segments
    pub fn new(schema: Option<impl Into<String>>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(Into::into),
            name: name.into(),
        }
    }

    /// Create an unqualified name
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Parse a dotted name as written by a caller
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Parse`] if the name is blank, has an empty or
    /// unterminated segment, or has more than two segments.
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = split_identifiers(input)?;
        match segments.len() {
            1 => Ok(Self::unqualified(segments.remove(0))),
            2 => {
                let name = segments.remove(1);
                let schema = segments.remove(0);
                Ok(Self::new(Some(schema), name))
            }
            _ => Err(TraceError::parse(format!(
                "improper qualified name (too many dotted names): {}",
                input.trim()
            ))),
        }
    }

    /// Schema segment, if any
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Routine name segment
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether the name carries an explicit schema
    pub fn is_qualified(&self) -> bool {
        self.schema.is_some()
    }

    /// Return a copy qualified with the given schema
    pub fn in_schema(&self, schema: impl Into<String>) -> Self {
        Self::new(Some(schema), self.name.clone())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write_identifier(f, schema)?;
            write!(f, ".")?;
        }
        write_identifier(f, &self.name)
    }
}

fn write_identifier(f: &mut fmt::Formatter<'_>, ident: &str) -> fmt::Result {
    if is_plain_identifier(ident) {
        write!(f, "{}", ident)
    } else {
        write!(f, "\"{}\"", ident.replace('"', "\"\""))
    }
}

fn is_plain_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
}

/// Split `a.b."C d"` into normalized segments
fn split_identifiers(input: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }

        let segment = if chars.peek() == Some(&'"') {
            chars.next();
            let mut quoted = String::new();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        quoted.push('"');
                    }
                    Some('"') => break,
                    Some(c) => quoted.push(c),
                    None => {
                        return Err(TraceError::parse(format!(
                            "unterminated quoted identifier in name: {}",
                            input.trim()
                        )))
                    }
                }
            }
            if quoted.is_empty() {
                return Err(TraceError::parse("zero-length delimited identifier"));
            }
            quoted
        } else {
            let mut plain = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' || c.is_whitespace() {
                    break;
                }
                plain.push(c.to_ascii_lowercase());
                chars.next();
            }
            if plain.is_empty() {
                return Err(TraceError::parse(format!(
                    "invalid name syntax: {:?}",
                    input
                )));
            }
            plain
        };
        segments.push(segment);

        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => return Ok(segments),
            Some('.') => continue,
            Some(_) => {
                return Err(TraceError::parse(format!(
                    "invalid name syntax: {:?}",
                    input
                )))
            }
        }
    }
}
