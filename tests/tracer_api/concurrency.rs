//! Concurrency Tests
//!
//! Traces from several threads share one host; nested traces on one thread
//! chain through the same hooks.

use crate::*;
use parking_lot::Mutex;
use std::sync::{Arc, Barrier, Weak};
use std::thread;

const THREADS: usize = 4;
const CALLS_PER_THREAD: usize = 20;

#[test]
fn test_parallel_traces_do_not_mix_entries() {
    let tracer = Arc::new(create_fixture_tracer());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let tracer = Arc::clone(&tracer);
            thread::spawn(move || {
                for i in 0..CALLS_PER_THREAD {
                    let (a, b) = (t as i64, i as i64);
                    let report = tracer.trace_report(&format!("add({}, {})", a, b)).unwrap();
                    assert_eq!(report.result, Value::Int(a + b));
                    assert_eq!(statements(&report), vec![format!("SELECT {} + {}", a, b)]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_hooks_clear(&tracer);
    assert_eq!(
        tracer.host().run_count(),
        (THREADS * CALLS_PER_THREAD) as u64
    );
}

#[test]
fn test_parallel_failures_leave_hooks_clear() {
    let tracer = Arc::new(create_fixture_tracer());

    let handles: Vec<_> = ["fails()", "nothing()", "add(x, 1)", "touch()"]
        .into_iter()
        .map(|call| {
            let tracer = Arc::clone(&tracer);
            thread::spawn(move || {
                for _ in 0..CALLS_PER_THREAD {
                    let _ = tracer.trace(call);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_hooks_clear(&tracer);
}

#[test]
fn test_tracers_sharing_a_host_take_turns() {
    let host = Arc::new(MemoryHost::new());
    let started = Arc::new(Barrier::new(2));

    let in_slow = Arc::clone(&started);
    host.create_routine("slow", &[], oid::INT4, move |host, _| {
        host.execute("SELECT slow_begin")?;
        in_slow.wait();
        // Give the other tracer time to try installing its hooks
        thread::sleep(std::time::Duration::from_millis(50));
        host.execute("SELECT slow_end")?;
        Ok(Value::Int(1))
    })
    .unwrap();
    host.create_routine("fast", &[], oid::INT4, |host, _| {
        host.execute("SELECT fast_1")?;
        host.execute("SELECT fast_2")?;
        Ok(Value::Int(2))
    })
    .unwrap();

    let first = Tracer::new(Arc::clone(&host));
    let second = Tracer::new(Arc::clone(&host));

    let slow = thread::spawn(move || first.trace_report("slow()").unwrap());
    started.wait();
    let fast = second.trace_report("fast()").unwrap();
    let slow = slow.join().unwrap();

    assert_eq!(statements(&slow), vec!["SELECT slow_end", "SELECT slow_begin"]);
    assert_eq!(statements(&fast), vec!["SELECT fast_2", "SELECT fast_1"]);
    assert!(host.hooks().is_empty());
}

#[test]
fn test_nested_trace_from_inside_a_routine() {
    let tracer = Arc::new(create_fixture_tracer());
    let slot: Arc<Mutex<Weak<Tracer>>> = Arc::new(Mutex::new(Weak::new()));
    let inner_reports = Arc::new(Mutex::new(Vec::<TraceReport>::new()));

    let (tracer_slot, sink) = (Arc::clone(&slot), Arc::clone(&inner_reports));
    tracer
        .host()
        .create_routine("audited", &[], oid::INT4, move |host, _| {
            host.execute("SELECT audit_begin")?;
            let tracer = tracer_slot
                .lock()
                .upgrade()
                .ok_or_else(|| HostError::new("tracer dropped"))?;
            let report = tracer
                .trace_report("two_steps(1)")
                .map_err(|e| HostError::new(e.to_string()))?;
            sink.lock().push(report);
            host.execute("SELECT audit_end")?;
            Ok(Value::Int(1))
        })
        .unwrap();
    *slot.lock() = Arc::downgrade(&tracer);

    let outer = tracer.trace_report("audited()").unwrap();

    let inner = inner_reports.lock().pop().unwrap();
    assert_eq!(statements(&inner), vec!["S2", "S1"]);
    assert!(inner.entries.iter().all(|e| e.routine_name() == "two_steps"));

    assert_eq!(
        statements(&outer),
        vec!["SELECT audit_end", "S2", "S1", "SELECT audit_begin"]
    );
    assert!(outer.entries.iter().all(|e| e.routine_name() == "audited"));
    assert_hooks_clear(&tracer);
}
