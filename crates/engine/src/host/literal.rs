//! Built-in literal parsers
//!
//! Input routines for the types [`MemoryHost`](super::MemoryHost) registers
//! out of the box. Each takes the raw literal exactly as the caller wrote it
//! (leading whitespace already trimmed by the call parser) and returns a
//! typed [`Value`] or the reason the text is invalid.
//!
//! Numeric and boolean parsers ignore surrounding whitespace. `text` takes
//! the literal verbatim, quotes included: `'a'` is the three-character
//! string `'a'`.

use super::InputParser;
use proctrace_core::{TypeId, Value};
use std::sync::Arc;

/// Catalog ids of the built-in types
pub mod oid {
    use proctrace_core::TypeId;

    /// `bool`
    pub const BOOL: TypeId = TypeId(16);
    /// `bytea`
    pub const BYTEA: TypeId = TypeId(17);
    /// `int8`
    pub const INT8: TypeId = TypeId(20);
    /// `int4`
    pub const INT4: TypeId = TypeId(23);
    /// `text`
    pub const TEXT: TypeId = TypeId(25);
    /// `json`
    pub const JSON: TypeId = TypeId(114);
    /// `float8`
    pub const FLOAT8: TypeId = TypeId(701);
    /// `void`, a return type with no input routine
    pub const VOID: TypeId = TypeId(2278);
}

/// Built-in types as `(id, name, input parser)`
pub fn builtin_types() -> Vec<(TypeId, &'static str, Option<InputParser>)> {
    vec![
        (oid::BOOL, "bool", Some(parser(parse_bool))),
        (oid::BYTEA, "bytea", Some(parser(parse_bytea))),
        (oid::INT8, "int8", Some(parser(parse_int8))),
        (oid::INT4, "int4", Some(parser(parse_int4))),
        (oid::TEXT, "text", Some(parser(parse_text))),
        (oid::JSON, "json", Some(parser(parse_json))),
        (oid::FLOAT8, "float8", Some(parser(parse_float8))),
        (oid::VOID, "void", None),
    ]
}

fn parser(f: fn(&str) -> Result<Value, String>) -> InputParser {
    Arc::new(f)
}

/// `bool`: t/true/yes/on/1 and f/false/no/off/0, case-insensitive
pub fn parse_bool(literal: &str) -> Result<Value, String> {
    match literal.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
        "f" | "false" | "n" | "no" | "off" | "0" => Ok(Value::Bool(false)),
        _ => Err("not a boolean".to_string()),
    }
}

/// `int4`: 32-bit signed integer
pub fn parse_int4(literal: &str) -> Result<Value, String> {
    literal
        .trim()
        .parse::<i32>()
        .map(|i| Value::Int(i as i64))
        .map_err(|e| e.to_string())
}

/// `int8`: 64-bit signed integer
pub fn parse_int8(literal: &str) -> Result<Value, String> {
    literal
        .trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|e| e.to_string())
}

/// `float8`: IEEE-754 double, including `NaN`, `Infinity`, `-Infinity`
pub fn parse_float8(literal: &str) -> Result<Value, String> {
    let trimmed = literal.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "nan" => return Ok(Value::Float(f64::NAN)),
        "infinity" | "+infinity" | "inf" | "+inf" => return Ok(Value::Float(f64::INFINITY)),
        "-infinity" | "-inf" => return Ok(Value::Float(f64::NEG_INFINITY)),
        _ => {}
    }
    trimmed
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|e| e.to_string())
}

/// `text`: the literal verbatim
pub fn parse_text(literal: &str) -> Result<Value, String> {
    Ok(Value::String(literal.to_string()))
}

/// `bytea`: `\x`-prefixed hex, otherwise the literal's UTF-8 bytes
pub fn parse_bytea(literal: &str) -> Result<Value, String> {
    let Some(hex) = literal.strip_prefix("\\x") else {
        return Ok(Value::Bytes(literal.as_bytes().to_vec()));
    };
    let hex = hex.trim_end();
    if hex.len() % 2 != 0 {
        return Err("invalid hexadecimal data: odd number of digits".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hexadecimal digit in {:?}", hex))
        })
        .collect::<Result<Vec<u8>, String>>()
        .map(Value::Bytes)
}

/// `json`: any JSON document
pub fn parse_json(literal: &str) -> Result<Value, String> {
    serde_json::from_str::<serde_json::Value>(literal)
        .map(Value::from)
        .map_err(|e| e.to_string())
}
