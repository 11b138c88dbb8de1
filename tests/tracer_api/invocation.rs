//! Successful Invocation Tests
//!
//! Tests for report contents, ordering, and argument coercion.

use crate::*;

// =============================================================================
// REPORT CONTENTS
// =============================================================================

#[test]
fn test_single_statement_routine() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("touch()").unwrap();

    assert_eq!(report.routine, "touch");
    assert_eq!(report.result, Value::Int(1));
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].routine_name(), "touch");
    assert_eq!(
        report.entries[0].statement_text(),
        "UPDATE counters SET n = n + 1"
    );
}

#[test]
fn test_text_report_layout() {
    let tracer = create_fixture_tracer();

    let text = tracer.trace("touch()").unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Routine Execution Trace Report");
    assert_eq!(lines[1], "=".repeat(lines[0].len()));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "Entry #1:");
    assert_eq!(lines[5], "Routine: touch");
    assert_eq!(lines[6], "Statement: UPDATE counters SET n = n + 1");
    assert!(lines[7].starts_with("Executed at: "));
    assert!(lines[7].ends_with(" UTC"));
    assert_eq!(lines.last(), Some(&"Total entries: 1"));
}

#[test]
fn test_no_statements_reports_no_records() {
    let tracer = create_fixture_tracer();

    let text = tracer.trace("echo(hello)").unwrap();

    assert!(text.contains("No execution records found"));
    assert!(!text.contains("Total entries"));
}

// =============================================================================
// ORDERING
// =============================================================================

#[test]
fn test_entries_most_recent_first() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("two_steps(5)").unwrap();
    assert_eq!(statements(&report), vec!["S2", "S1"]);

    let text = tracer.trace("two_steps(5)").unwrap();
    let first = text.find("Entry #1:\n----------------\nRoutine: two_steps\nStatement: S2");
    let second = text.find("Entry #2:\n----------------\nRoutine: two_steps\nStatement: S1");
    assert!(first.is_some());
    assert!(second.is_some());
    assert!(first < second);
}

#[test]
fn test_timestamps_do_not_decrease_toward_older_entries() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("two_steps(1)").unwrap();
    assert!(report.entries[0].timestamp() >= report.entries[1].timestamp());
}

#[test]
fn test_nested_routine_calls_are_captured() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("billing.close_month(3, 'march')").unwrap();

    assert_eq!(
        statements(&report),
        vec![
            "UPDATE counters SET n = n + 1",
            "INSERT INTO audit VALUES ('march')",
            "UPDATE ledger SET closed = true WHERE month = 3",
        ]
    );
    // Labeled with the routine under trace, not the nested callee
    assert!(report
        .entries
        .iter()
        .all(|e| e.routine_name() == "billing.close_month"));
}

#[test]
fn test_qualified_and_case_folded_names() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("PUBLIC.Touch()").unwrap();
    assert_eq!(report.routine, "public.touch");
    assert_eq!(report.entries[0].routine_name(), "public.touch");
}

#[test]
fn test_default_host_statements_still_run() {
    let tracer = create_fixture_tracer();

    tracer.trace("two_steps(1)").unwrap();

    assert_eq!(tracer.host().started_statements(), vec!["S1", "S2"]);
    assert_eq!(tracer.host().run_count(), 2);
}

// =============================================================================
// ARGUMENT COERCION
// =============================================================================

#[test]
fn test_integer_arguments() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("add(2, 40)").unwrap();
    assert_eq!(report.result, Value::Int(42));
    assert_eq!(statements(&report), vec!["SELECT 2 + 40"]);
}

#[test]
fn test_text_keeps_quotes_and_trailing_space() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("echo(  'a b' )").unwrap();
    assert_eq!(report.result, Value::String("'a b' ".into()));
}

#[test]
fn test_builtin_literal_types() {
    let tracer = create_fixture_tracer();

    let report = tracer
        .trace_report(r#"describe(yes, 9000000000, 2.5, \xdeadbeef, {"k": [1]})"#)
        .unwrap();
    assert_eq!(
        report.result,
        Value::String("Bool,Int,Float,Bytes,Object".into())
    );
}

#[test]
fn test_blank_interior_and_blank_fields() {
    let tracer = create_fixture_tracer();

    // All-whitespace interior: zero arguments, and echo takes one
    let err = tracer.trace_report("echo( )").unwrap_err();
    assert_eq!(err.error_code(), "ResolutionError");

    // A blank middle field is an empty literal, so the arity is 3
    let err = tracer.trace_report("add(1, , 2)").unwrap_err();
    assert_eq!(err.error_code(), "ResolutionError");

    // Zero-length fields are skipped
    let report = tracer.trace_report("add(1,,2)").unwrap();
    assert_eq!(report.result, Value::Int(3));
}
