//! Tracer API Test Suite
//!
//! End-to-end tests of the public `Tracer` surface over the in-memory host.
//!
//! ## Key Verification Points
//!
//! 1. Reports list every statement a routine started, most recent first
//! 2. Every failure is a single structured error from the right stage
//! 3. Hooks and trace state are restored after every call, failed or not
//! 4. Concurrent and nested traces do not leak entries into each other
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tracer tests
//! cargo test --test tracer_api
//!
//! # Run failure-path tests only
//! cargo test --test tracer_api failures::
//! ```

use proctrace::host::literal::oid;
use proctrace::host::ExecutionPipeline;
use proctrace::{HostError, MemoryHost, TraceReport, Tracer, Value};

// Test modules
pub mod concurrency;
pub mod custom_host;
pub mod invocation;
pub mod wire;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Create a tracer over an empty in-memory host
pub fn create_tracer() -> Tracer {
    Tracer::in_memory()
}

/// Create a tracer whose host has the standard routine fixture installed
pub fn create_fixture_tracer() -> Tracer {
    let tracer = create_tracer();
    install_fixture(tracer.host());
    tracer
}

/// Install the standard routines
///
/// | Routine | Statements started |
/// |---------|--------------------|
/// | `touch()` | one UPDATE |
/// | `two_steps(int4)` | `S1`, `S2` |
/// | `add(int4, int4)` | one SELECT |
/// | `echo(text)` | none |
/// | `billing.close_month(int4, text)` | two, then `touch()` |
/// | `fails()` | one SELECT, then errors |
/// | `nothing()` | one SELECT, returns no value |
/// | `explodes()` | one SELECT, then panics |
/// | `describe(bool, int8, float8, bytea, json)` | none |
pub fn install_fixture(host: &MemoryHost) {
    host.create_routine("touch", &[], oid::INT4, |host, _| {
        host.execute("UPDATE counters SET n = n + 1")?;
        Ok(Value::Int(1))
    })
    .unwrap();

    host.create_routine("two_steps", &[oid::INT4], oid::INT4, |host, args| {
        host.execute("S1")?;
        host.execute("S2")?;
        Ok(args[0].clone())
    })
    .unwrap();

    host.create_routine("add", &[oid::INT4, oid::INT4], oid::INT4, |host, args| {
        host.execute(&format!("SELECT {} + {}", args[0], args[1]))?;
        let sum = args[0].as_int().unwrap_or(0) + args[1].as_int().unwrap_or(0);
        Ok(Value::Int(sum))
    })
    .unwrap();

    host.create_routine("echo", &[oid::TEXT], oid::TEXT, |_, args| Ok(args[0].clone()))
        .unwrap();

    host.create_routine(
        "billing.close_month",
        &[oid::INT4, oid::TEXT],
        oid::INT4,
        |host, args| {
            host.execute(&format!("UPDATE ledger SET closed = true WHERE month = {}", args[0]))?;
            host.execute(&format!("INSERT INTO audit VALUES ({})", args[1]))?;
            host.call("touch", Vec::new())
        },
    )
    .unwrap();

    host.create_routine("fails", &[], oid::INT4, |host, _| {
        host.execute("SELECT 1")?;
        Err(HostError::new("division by zero"))
    })
    .unwrap();

    host.create_routine("nothing", &[], oid::VOID, |host, _| {
        host.execute("SELECT 1")?;
        Ok(Value::Null)
    })
    .unwrap();

    host.create_routine("explodes", &[], oid::INT4, |host, _| {
        host.execute("SELECT 1")?;
        panic!("routine exploded");
    })
    .unwrap();

    host.create_routine(
        "describe",
        &[oid::BOOL, oid::INT8, oid::FLOAT8, oid::BYTEA, oid::JSON],
        oid::TEXT,
        |_, args| {
            let kinds: Vec<&str> = args.iter().map(|v| v.type_name()).collect();
            Ok(Value::String(kinds.join(",")))
        },
    )
    .unwrap();
}

/// Statement texts of a report, in report order
pub fn statements(report: &TraceReport) -> Vec<String> {
    report
        .entries
        .iter()
        .map(|e| e.statement_text().to_string())
        .collect()
}

/// Assert the host has no interceptors installed
pub fn assert_hooks_clear(tracer: &Tracer) {
    assert!(
        tracer.host().hooks().is_empty(),
        "hooks left installed: {:?}",
        tracer.host().hooks()
    );
}
