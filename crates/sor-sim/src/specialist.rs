//! One specialist thread per `Specialty`. Reads its color-priority queue
//! (Red before Yellow before Green, FIFO within a class), treats a
//! patient for a speed-scaled `0.5..2.0s`, then rolls an outcome
//! (850/1000 home, 995/1000 ward, else transferred), releasing the
//! patient's waitroom seat(s).
//!
//! The director can interrupt a specialist (`InterruptFlag::raise`), but
//! treatment already in progress is never abandoned: the flag is only
//! consulted between patients, a safe point, never mid-exam. Once
//! consulted the specialist takes an out-of-band 5-10s ward trip that is
//! *not* speed-scaled, since it represents a real walk to another ward,
//! not simulated service time.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sor_rt::{InterruptFlag, ShutdownSignal};
use sor_types::{LogMsg, Outcome, Specialty};

use crate::channels::SpecialistQueue;
use crate::state::SharedState;
use crate::util::{chunked_sleep, send_log, TAG_SPECIALIST_BASE};

const IDLE_POLL: Duration = Duration::from_millis(100);
const WARD_TRIP_MIN_SECS: f64 = 5.0;
const WARD_TRIP_MAX_SECS: f64 = 10.0;
const EXAM_MIN_SECS: f64 = 0.5;
const EXAM_MAX_SECS: f64 = 2.0;

pub fn spawn(
    specialty: Specialty,
    state: Arc<SharedState>,
    queue: Arc<SpecialistQueue>,
    interrupt: Arc<InterruptFlag>,
    shutdown: Arc<ShutdownSignal>,
    log: Sender<LogMsg>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("specialist-{specialty}"))
        .spawn(move || run(specialty, state, queue, interrupt, shutdown, log))
        .expect("failed to spawn specialist thread")
}

fn run(
    specialty: Specialty,
    state: Arc<SharedState>,
    queue: Arc<SpecialistQueue>,
    interrupt: Arc<InterruptFlag>,
    shutdown: Arc<ShutdownSignal>,
    log: Sender<LogMsg>,
) {
    let mut rng = StdRng::seed_from_u64(state.config.worker_seed(TAG_SPECIALIST_BASE + specialty.index() as u64));

    loop {
        if interrupt.take() {
            if let Some(handle) = state.specialists.get(&specialty) {
                handle.on_break.store(true, Ordering::SeqCst);
            }
            send_log(&log, state.elapsed_secs(), format!("{specialty} specialist called away"));
            let trip_secs = rng.random_range(WARD_TRIP_MIN_SECS..WARD_TRIP_MAX_SECS);
            let interrupted_by_shutdown = chunked_sleep(trip_secs, &shutdown).is_some();
            if let Some(handle) = state.specialists.get(&specialty) {
                handle.on_break.store(false, Ordering::SeqCst);
            }
            if interrupted_by_shutdown {
                return;
            }
            send_log(&log, state.elapsed_secs(), format!("{specialty} specialist back from ward"));
            continue;
        }

        match queue.pop_timeout(IDLE_POLL) {
            Some((_, msg)) => {
                let patient = msg.patient;
                send_log(&log, state.elapsed_secs(), format!("{specialty} specialist examining patient {}", patient.id));

                let exam_secs = state.config.scaled_secs(rng.random_range(EXAM_MIN_SECS..EXAM_MAX_SECS));
                if chunked_sleep(exam_secs, &shutdown).is_some() {
                    // Even on shutdown, the exam in progress is completed
                    // before the thread exits: the sleep above already
                    // ran to completion or was cut by a signal mid-chunk,
                    // but the patient is still discharged below either way.
                }

                let roll: u32 = rng.random_range(0..1000);
                let outcome = if roll < 850 {
                    Outcome::SentHome
                } else if roll < 995 {
                    Outcome::AdmittedToWard
                } else {
                    Outcome::TransferredElsewhere
                };

                state.waitroom.release_n(patient.waitroom_seats());
                state.record_discharge(patient.id, outcome, patient.waitroom_seats());
                send_log(&log, state.elapsed_secs(), format!("patient {} {outcome}", patient.id));
                let _ = state.specialist_replies.reply(patient.id, outcome);
            }
            None => {
                if shutdown.is_signalled() && queue.is_empty() && !interrupt.is_set() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sor_types::{CliArgs, Color, Config, PatientId, PatientRecord, SpecialistMsg};

    fn fresh_state(seed: u64) -> Arc<SharedState> {
        let cfg = Config::try_from(CliArgs {
            n: 20,
            k: None,
            duration: 0,
            speed: 1000.0,
            seed: Some(seed),
            interval: 1.0,
        })
        .unwrap();
        Arc::new(SharedState::new(cfg, Default::default()))
    }

    #[test]
    fn treats_patient_and_releases_seat() {
        let state = fresh_state(7);
        let queue = crate::channels::new_specialist_queue();
        let interrupt = Arc::new(InterruptFlag::new());
        let shutdown = Arc::new(ShutdownSignal::new());
        let (tx, _rx) = crossbeam_channel::unbounded();

        let patient = PatientRecord::new(PatientId(1), 40, false, false, false);
        state.waitroom.acquire_n(1);
        queue.push(Color::Red, SpecialistMsg { patient, color: Color::Red, specialty: Specialty::Cardiology });

        let handle = spawn(Specialty::Cardiology, Arc::clone(&state), queue, interrupt, Arc::clone(&shutdown), tx);

        for _ in 0..100 {
            if state.discharged_count() == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(state.discharged_count(), 1);
        assert_eq!(state.waitroom.available(), 20);

        shutdown.signal(sor_rt::SignalKind::Shutdown);
        handle.join().unwrap();
    }

    #[test]
    fn interrupt_sends_idle_specialist_on_ward_trip_without_losing_patient() {
        let state = fresh_state(11);
        let queue = crate::channels::new_specialist_queue();
        let interrupt = Arc::new(InterruptFlag::new());
        let shutdown = Arc::new(ShutdownSignal::new());
        let (tx, rx) = crossbeam_channel::unbounded();

        interrupt.raise();
        let handle = spawn(Specialty::Neurology, Arc::clone(&state), Arc::clone(&queue), Arc::clone(&interrupt), Arc::clone(&shutdown), tx);

        // Push a patient while the specialist is away; it must still be
        // waiting in the queue (never dropped) once the trip ends.
        thread::sleep(Duration::from_millis(20));
        let patient = PatientRecord::new(PatientId(2), 30, false, false, false);
        state.waitroom.acquire_n(1);
        queue.push(Color::Green, SpecialistMsg { patient, color: Color::Green, specialty: Specialty::Neurology });

        for _ in 0..250 {
            if state.discharged_count() == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
        assert_eq!(state.discharged_count(), 1);
        assert!(rx.try_iter().any(|m| m.text.contains("called away")));

        shutdown.signal(sor_rt::SignalKind::Shutdown);
        handle.join().unwrap();
    }
}
