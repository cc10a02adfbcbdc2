//! End-to-end scenarios driving the whole simulation, mirroring the
//! pack's convention of integration tests living under `tests/` next to
//! unit tests inline in each module.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sor_rt::{ShutdownSignal, SignalKind};
use sor_types::{CliArgs, Config};

fn log_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("sor-sim-it-{tag}-{}.log", std::process::id()))
}

fn run_for_duration(seed: u64, duration: u64, n: u32, tag: &str) -> (sor_sim::SimSummary, String) {
    let cfg = Config::try_from(CliArgs {
        n,
        k: None,
        duration,
        speed: 200.0,
        seed: Some(seed),
        interval: 0.05,
    })
    .unwrap();
    let path = log_path(tag);
    let shutdown = Arc::new(ShutdownSignal::new());
    let summary = sor_sim::run(cfg, path.clone(), shutdown, |_state| {});
    let contents = std::fs::read_to_string(&path).unwrap_or_default();
    let _ = std::fs::remove_file(&path);
    (summary, contents)
}

/// P1-style property: the simulation runs to completion for a fixed
/// duration without panicking, and produces a non-empty, well-formed log.
#[test]
fn simulation_runs_to_completion_and_produces_well_formed_log() {
    let (summary, contents) = run_for_duration(1, 1, 20, "basic");
    assert!(!contents.is_empty(), "expected at least one log line");
    for line in contents.lines() {
        assert!(line.starts_with('['), "log line missing timestamp bracket: {line}");
        assert!(line.contains("s]"), "log line missing seconds marker: {line}");
    }
    assert!(summary.ran_for >= Duration::from_millis(900));
}

/// R1/R2-style property: identical seeds produce identical simulated
/// event logs, since every worker's RNG stream is derived from the same
/// base seed regardless of how threads happen to interleave.
#[test]
fn same_seed_produces_same_event_log() {
    let (_s1, first) = run_for_duration(7, 1, 15, "repro-a");
    let (_s2, second) = run_for_duration(7, 1, 15, "repro-b");
    assert_eq!(first, second, "identical seeds must produce identical simulated logs");
}

/// Different seeds are not required to diverge on every run, but across
/// enough distinct seeds at least one pair should differ, confirming the
/// seed actually drives the random draws instead of being ignored.
#[test]
fn different_seeds_can_produce_different_event_logs() {
    let (_s1, a) = run_for_duration(100, 1, 15, "vary-a");
    let (_s2, b) = run_for_duration(200, 1, 15, "vary-b");
    assert_ne!(a, b, "different seeds are expected to produce different draws");
}

/// S-style scenario: requesting an evacuation mid-run still lets the
/// simulation terminate within its grace period instead of hanging.
#[test]
fn evacuation_signal_still_terminates_promptly() {
    let cfg = Config::try_from(CliArgs {
        n: 20,
        k: None,
        duration: 0,
        speed: 50.0,
        seed: Some(55),
        interval: 0.05,
    })
    .unwrap();
    let path = log_path("evac");
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown2 = Arc::clone(&shutdown);

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        shutdown2.signal(SignalKind::Evacuate);
    });

    let start = std::time::Instant::now();
    let _summary = sor_sim::run(cfg, path.clone(), shutdown, |_state| {});
    stopper.join().unwrap();

    // Grace period is 3s; the whole run (including every specialist's
    // worst-case 10s ward trip triggered by the evacuation recall) must
    // still not hang indefinitely.
    assert!(start.elapsed() < Duration::from_secs(15));
    let _ = std::fs::remove_file(&path);
}
