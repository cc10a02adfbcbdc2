//! The root supervisor: wires every component together, then tears the
//! simulation down on a shutdown or evacuation signal.
//!
//! Workers are spawned in a fixed order (logger, director, registration,
//! registration controller, triage, six specialists, generator), then
//! reaped with a shared 3s grace-period budget before teardown returns.
//! Rust threads cannot be force-killed; past the grace period this
//! simply stops waiting and returns rather than blocking forever on a
//! straggler (see DESIGN.md).

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use sor_rt::{InterruptFlag, ShutdownSignal, SignalKind};
use sor_types::{Config, LogMsg, Specialty};

use crate::channels;
use crate::registration::{self, Gating};
use crate::state::{SharedState, SpecialistHandle};
use crate::{director, generator, logger, reg_controller, specialist, triage};

const GRACE_PERIOD: Duration = Duration::from_secs(3);

pub struct SimSummary {
    pub patients_discharged: usize,
    pub ran_for: Duration,
}

/// Runs the whole simulation to completion. `shutdown` is shared with the
/// caller (the CLI's key-reader/SIGINT/duration-timer loop); this
/// function returns once every worker has wound down.
///
/// `on_started` is invoked once every worker is spawned, handed the
/// shared state's `Arc`, so a caller running this on a background
/// thread (the CLI's interactive mode) can stash it somewhere a key
/// listener thread can reach to target a specific specialist's
/// interrupt flag.
pub fn run(
    config: Config,
    log_path: impl Into<std::path::PathBuf>,
    shutdown: Arc<ShutdownSignal>,
    on_started: impl FnOnce(Arc<SharedState>),
) -> SimSummary {
    let (log_tx, log_rx) = crossbeam_channel::unbounded::<LogMsg>();
    let logger_handle = logger::spawn(log_path, log_rx);

    let mut specialists_state = FxHashMap::default();
    let mut specialist_queues = FxHashMap::default();
    for s in Specialty::ALL {
        let flag = Arc::new(InterruptFlag::new());
        specialists_state.insert(s, SpecialistHandle { interrupt: flag, on_break: std::sync::atomic::AtomicBool::new(false) });
        specialist_queues.insert(s, channels::new_specialist_queue());
    }
    let specialist_queues = Arc::new(specialist_queues);

    let state = Arc::new(SharedState::new(config, specialists_state));
    let registration_queue = channels::new_registration_queue();
    let triage_queue = channels::new_triage_queue();

    let mut workers: Vec<JoinHandle<()>> = Vec::new();

    workers.push(director::spawn(Arc::clone(&state), Arc::clone(&shutdown), log_tx.clone()));
    workers.push(reg_controller::spawn(Arc::clone(&state), Arc::clone(&shutdown), log_tx.clone()));
    workers.push(registration::spawn(
        1,
        Gating::AlwaysOpen,
        Arc::clone(&state),
        Arc::clone(&registration_queue),
        Arc::clone(&triage_queue),
        Arc::clone(&shutdown),
        log_tx.clone(),
    ));
    workers.push(registration::spawn(
        2,
        Gating::GatedByController,
        Arc::clone(&state),
        Arc::clone(&registration_queue),
        Arc::clone(&triage_queue),
        Arc::clone(&shutdown),
        log_tx.clone(),
    ));
    workers.push(triage::spawn(
        Arc::clone(&state),
        Arc::clone(&triage_queue),
        Arc::clone(&specialist_queues),
        Arc::clone(&shutdown),
        log_tx.clone(),
    ));
    for s in Specialty::ALL {
        let interrupt = Arc::clone(&state.specialists.get(&s).unwrap().interrupt);
        workers.push(specialist::spawn(
            s,
            Arc::clone(&state),
            Arc::clone(&specialist_queues[&s]),
            interrupt,
            Arc::clone(&shutdown),
            log_tx.clone(),
        ));
    }

    let generator_handle = generator::spawn(Arc::clone(&state), Arc::clone(&registration_queue), Arc::clone(&shutdown), log_tx.clone());

    on_started(Arc::clone(&state));

    // Block here until a shutdown or evacuation is signaled (by the CLI's
    // interactive key loop, SIGINT, or the generator itself on duration
    // timeout).
    while !shutdown.is_signalled() {
        thread::sleep(Duration::from_millis(100));
    }

    if shutdown.current() == SignalKind::Evacuate {
        for (_, handle) in state.specialists.iter() {
            handle.interrupt.raise();
        }
        crate::util::send_log(&log_tx, state.elapsed_secs(), "evacuation ordered: recalling every specialist");
    }

    let _ = generator_handle.join();

    let deadline = Instant::now() + GRACE_PERIOD;
    for worker in workers {
        let remaining = deadline.saturating_duration_since(Instant::now());
        join_with_timeout(worker, remaining);
    }

    drop(log_tx);
    let _ = logger_handle.join();

    SimSummary {
        patients_discharged: state.discharged_count(),
        ran_for: state.start.elapsed(),
    }
}

/// Joins a thread, giving up (and leaking the `JoinHandle`) once `budget`
/// elapses. Rust has no safe `thread::kill`; a straggler past its grace
/// period is left to finish on its own rather than blocking teardown.
fn join_with_timeout(handle: JoinHandle<()>, budget: Duration) {
    if handle.is_finished() {
        let _ = handle.join();
        return;
    }
    let start = Instant::now();
    while !handle.is_finished() && start.elapsed() < budget {
        thread::sleep(Duration::from_millis(20));
    }
    if handle.is_finished() {
        let _ = handle.join();
    }
}
