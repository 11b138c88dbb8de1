//! JSON Output Tests
//!
//! Tests for the structured report and the wire error form.

use crate::*;
use proctrace::{TraceOptions, WireError};

#[test]
fn test_success_json() {
    let tracer = create_fixture_tracer();

    let json: serde_json::Value = serde_json::from_str(&tracer.trace_json("two_steps(4)")).unwrap();

    assert_eq!(json["routine"], "two_steps");
    assert_eq!(json["entries"][0]["statement_text"], "S2");
    assert_eq!(json["entries"][1]["statement_text"], "S1");
    assert_eq!(json["entries"][0]["routine_name"], "two_steps");
    assert!(json["trace_id"].is_string());
}

#[test]
fn test_report_round_trips_through_serde() {
    let tracer = create_fixture_tracer();

    let report = tracer.trace_report("touch()").unwrap();
    let decoded: TraceReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(decoded, report);
}

#[test]
fn test_special_float_results_round_trip() {
    let tracer = create_fixture_tracer();
    tracer
        .host()
        .create_routine("ratio", &[oid::FLOAT8], oid::FLOAT8, |host, args| {
            host.execute("SELECT ratio")?;
            Ok(args[0].clone())
        })
        .unwrap();

    let report = tracer.trace_report("ratio(-Infinity)").unwrap();
    let json = report.to_json().unwrap();
    assert!(json.contains(r#""result":{"Float":{"$f64":"-Inf"}}"#));
    let decoded: TraceReport = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, report);

    // NaN never compares equal, so check the variant instead
    let json = tracer.trace_json("ratio(NaN)");
    let decoded: TraceReport = serde_json::from_str(&json).unwrap();
    assert!(matches!(decoded.result, Value::Float(f) if f.is_nan()));
    assert_eq!(statements(&decoded), vec!["SELECT ratio"]);
}

#[test]
fn test_error_json() {
    let tracer = create_fixture_tracer();

    let wire: WireError = serde_json::from_str(&tracer.trace_json("add(abc, 1)")).unwrap();

    assert_eq!(wire.code, "LiteralConversionError");
    assert_eq!(wire.message, r#"invalid input syntax for type int4: "abc""#);
    let details = wire.details.unwrap();
    assert_eq!(details["type_name"], "int4");
    assert_eq!(details["literal"], "abc");
}

#[test]
fn test_arity_details() {
    let tracer = create_fixture_tracer();

    let wire: WireError = serde_json::from_str(&tracer.trace_json("missing(1, 2)")).unwrap();
    assert_eq!(wire.code, "ResolutionError");
    assert_eq!(wire.details.unwrap()["arity"], 2);
}

#[test]
fn test_options_from_json_config() {
    let options: TraceOptions =
        serde_json::from_str(r#"{"header": "Audit", "timestamp_format": "%Y"}"#).unwrap();
    let tracer = Tracer::builder().options(options).build_in_memory();
    install_fixture(tracer.host());

    let text = tracer.trace("touch()").unwrap();
    assert!(text.starts_with("Audit\n=====\n"));
    assert!(text.lines().any(|l| l.starts_with("Executed at: ") && l.len() == "Executed at: ".len() + 4));
}
