//! Patient arrivals: forks a new patient at `interval * uniform(0.7, 1.3)`
//! seconds, speed-scaled, and stops once `--duration` elapses (if nonzero)
//! or a shutdown/evacuation signal arrives.
//!
//! Each arrival independently rolls minor/VIP status and an age within
//! the matching range before being handed off to its own patient thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sor_types::{LogMsg, PatientRecord};

use crate::channels::RegistrationQueue;
use crate::patient;
use crate::state::SharedState;
use crate::util::{send_log, TAG_GENERATOR};

const MINOR_CHANCE_PCT: u32 = 20;
const VIP_CHANCE_PCT: u32 = 20;
const MINOR_MIN_AGE: u32 = 1;
const MINOR_MAX_AGE: u32 = 18;
const ADULT_MIN_AGE: u32 = 18;
const ADULT_MAX_AGE: u32 = 76;

pub fn spawn(
    state: Arc<SharedState>,
    registration: Arc<RegistrationQueue>,
    shutdown: Arc<sor_rt::ShutdownSignal>,
    log: Sender<LogMsg>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("generator".into())
        .spawn(move || run(state, registration, shutdown, log))
        .expect("failed to spawn generator thread")
}

fn run(state: Arc<SharedState>, registration: Arc<RegistrationQueue>, shutdown: Arc<sor_rt::ShutdownSignal>, log: Sender<LogMsg>) {
    let mut rng = StdRng::seed_from_u64(state.config.worker_seed(TAG_GENERATOR));
    let mut children: Vec<JoinHandle<()>> = Vec::new();

    loop {
        let jitter = state.config.interval * rng.random_range(0.7..1.3);
        let wait_secs = state.config.scaled_secs(jitter).max(0.0);
        if shutdown.sleep(Duration::from_secs_f64(wait_secs)).is_some() {
            break;
        }

        if state.config.duration > 0 && state.elapsed_secs() >= state.config.duration as f64 {
            shutdown.signal(sor_rt::SignalKind::Shutdown);
            break;
        }

        let id = state.next_patient_id();
        let is_minor = rng.random_range(0..100) < MINOR_CHANCE_PCT;
        let is_vip = rng.random_range(0..100) < VIP_CHANCE_PCT;
        let has_guardian = is_minor;
        let age = if is_minor {
            rng.random_range(MINOR_MIN_AGE..MINOR_MAX_AGE)
        } else {
            rng.random_range(ADULT_MIN_AGE..ADULT_MAX_AGE)
        };

        let record = PatientRecord::new(id, age, is_minor, is_vip, has_guardian);
        send_log(
            &log,
            state.elapsed_secs(),
            format!(
                "patient {id} arrives (age {age}{})",
                if is_vip { ", VIP" } else { "" }
            ),
        );
        children.push(patient::spawn(Arc::clone(&state), Arc::clone(&registration), record, log.clone()));
    }

    for handle in children {
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sor_types::{CliArgs, Config};

    #[test]
    fn stops_once_configured_duration_elapses() {
        let cfg = Config::try_from(CliArgs {
            n: 50,
            k: None,
            duration: 1,
            speed: 1000.0,
            seed: Some(9),
            interval: 0.001,
        })
        .unwrap();
        let state = Arc::new(SharedState::new(cfg, Default::default()));
        let registration = crate::channels::new_registration_queue();
        let shutdown = Arc::new(sor_rt::ShutdownSignal::new());
        let (tx, _rx) = crossbeam_channel::unbounded();

        let handle = spawn(Arc::clone(&state), registration, Arc::clone(&shutdown), tx);
        for _ in 0..200 {
            if shutdown.is_signalled() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(shutdown.is_signalled());
        handle.join().unwrap();
    }

    #[test]
    fn stops_promptly_on_external_shutdown_signal() {
        let cfg = Config::try_from(CliArgs {
            n: 50,
            k: None,
            duration: 0,
            speed: 1.0,
            seed: Some(9),
            interval: 5.0,
        })
        .unwrap();
        let state = Arc::new(SharedState::new(cfg, Default::default()));
        let registration = crate::channels::new_registration_queue();
        let shutdown = Arc::new(sor_rt::ShutdownSignal::new());
        let (tx, _rx) = crossbeam_channel::unbounded();

        let handle = spawn(Arc::clone(&state), registration, Arc::clone(&shutdown), tx);
        thread::sleep(Duration::from_millis(20));
        shutdown.signal(sor_rt::SignalKind::Shutdown);
        handle.join().unwrap();
    }
}
