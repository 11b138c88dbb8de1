//! # proctrace
//!
//! Dynamic routine invocation with statement-level execution tracing.
//!
//! proctrace takes a textual call such as `billing.close_month(2024, 3)`,
//! resolves it against a host's routine catalog, converts each literal with
//! the parameter type's input parser, invokes the routine, and reports every
//! statement the routine transitively started.
//!
//! ## Quick Start
//!
//! ```
//! use proctrace::prelude::*;
//!
//! let tracer = Tracer::in_memory();
//! tracer
//!     .host()
//!     .create_routine("public.close_month", &[oid::INT4], oid::INT4, |host, args| {
//!         host.execute("UPDATE ledger SET closed = true")?;
//!         host.execute("INSERT INTO audit VALUES ('closed')")?;
//!         Ok(args[0].clone())
//!     })
//!     .unwrap();
//!
//! let report = tracer.trace("close_month(3)").unwrap();
//! assert!(report.contains("Total entries: 2"));
//! ```
//!
//! ## Hosts
//!
//! The engine reaches storage and execution only through the traits in
//! [`host`]. [`MemoryHost`] implements them in memory; embedders implement
//! them over their own catalog and executor and pass the host to
//! [`Tracer::new`].
//!
//! ## Errors
//!
//! Every failure is a single [`TraceError`] with a stable
//! [`error_code`](TraceError::error_code). Hooks and trace state are cleaned
//! up before the error reaches the caller.

#![warn(missing_docs)]

mod tracer;
mod types;

pub mod prelude;

// Re-export main entry points
pub use tracer::{Tracer, TracerBuilder};

// Re-export host interfaces
pub use proctrace_engine::host;

// Re-export types
pub use types::*;
