//! Core types for proctrace
//!
//! This crate defines the types shared by the engine and its hosts:
//! - [`Value`]: typed argument and result values
//! - [`QualifiedName`], [`RoutineId`], [`TypeId`], [`TraceId`]: identifiers
//! - [`RoutineDescriptor`], [`Statement`]: what hosts hand to the engine
//! - [`TraceError`], [`HostError`]: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod routine;
pub mod types;
pub mod value;

pub use error::{HostError, HostResult, Result, TraceError, WireError};
pub use routine::{RoutineDescriptor, Statement};
pub use types::{QualifiedName, RoutineId, TraceId, TypeId};
pub use value::{SpecialFloatKind, Value};
