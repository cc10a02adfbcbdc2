//! The director: on a uniform 3-12s interval, interrupts one randomly
//! chosen specialist (a targeted interrupt, distinct from shutdown or
//! mass evacuation).
//!
//! The interval itself is not speed-scaled: it represents an out-of-band
//! administrative event, not simulated patient-care time.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sor_rt::ShutdownSignal;
use sor_types::{LogMsg, Specialty};

use crate::state::SharedState;
use crate::util::{send_log, TAG_DIRECTOR};

const MIN_INTERVAL_SECS: f64 = 3.0;
const MAX_INTERVAL_SECS: f64 = 12.0;

pub fn spawn(state: Arc<SharedState>, shutdown: Arc<ShutdownSignal>, log: Sender<LogMsg>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("director".into())
        .spawn(move || run(state, shutdown, log))
        .expect("failed to spawn director thread")
}

fn run(state: Arc<SharedState>, shutdown: Arc<ShutdownSignal>, log: Sender<LogMsg>) {
    let mut rng = StdRng::seed_from_u64(state.config.worker_seed(TAG_DIRECTOR));
    loop {
        let wait_secs = rng.random_range(MIN_INTERVAL_SECS..MAX_INTERVAL_SECS);
        if shutdown.sleep(std::time::Duration::from_secs_f64(wait_secs)).is_some() {
            return;
        }

        let specialty = Specialty::ALL[rng.random_range(0..Specialty::ALL.len())];
        if let Some(handle) = state.specialists.get(&specialty) {
            handle.interrupt.raise();
            send_log(&log, state.elapsed_secs(), format!("director interrupts the {specialty} specialist"));
        }
    }
}
