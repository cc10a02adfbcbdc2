//! Triage: an instantaneous color/specialty decision per patient, no
//! sleep.
//!
//! Color roll: Red 10%, Yellow 35%, Green 50%, sent home 5% (cumulative
//! thresholds 10/45/95/100). Routing: minors always go to `Pediatrics`;
//! adults are drawn uniformly from the other five specialties.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use sor_rt::ShutdownSignal;
use sor_types::{Color, LogMsg, Outcome, Specialty, SpecialistMsg, TriageOutcome};

use crate::channels::TriageQueue;
use crate::state::SharedState;
use crate::util::{send_log, TAG_TRIAGE};

const IDLE_POLL: Duration = Duration::from_millis(100);

pub fn spawn(
    state: Arc<SharedState>,
    queue: Arc<TriageQueue>,
    specialist_queues: Arc<FxHashMap<Specialty, Arc<crate::channels::SpecialistQueue>>>,
    shutdown: Arc<ShutdownSignal>,
    log: Sender<LogMsg>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("triage".into())
        .spawn(move || run(state, queue, specialist_queues, shutdown, log))
        .expect("failed to spawn triage thread")
}

fn run(
    state: Arc<SharedState>,
    queue: Arc<TriageQueue>,
    specialist_queues: Arc<FxHashMap<Specialty, Arc<crate::channels::SpecialistQueue>>>,
    shutdown: Arc<ShutdownSignal>,
    log: Sender<LogMsg>,
) {
    let mut rng = StdRng::seed_from_u64(state.config.worker_seed(TAG_TRIAGE));
    loop {
        match queue.pop_timeout(IDLE_POLL) {
            Some(msg) => {
                let patient = msg.patient;
                let roll: u32 = rng.random_range(0..100);
                let color = if roll < 10 {
                    Some(Color::Red)
                } else if roll < 45 {
                    Some(Color::Yellow)
                } else if roll < 95 {
                    Some(Color::Green)
                } else {
                    None
                };

                match color {
                    None => {
                        state.waitroom.release_n(patient.waitroom_seats());
                        send_log(&log, state.elapsed_secs(), format!("patient {} sent home after triage", patient.id));
                        state.record_discharge(patient.id, Outcome::SentHome, patient.waitroom_seats());
                        let _ = state.triage_replies.reply(patient.id, TriageOutcome::SentHome);
                    }
                    Some(color) => {
                        let specialty = if patient.is_minor {
                            Specialty::Pediatrics
                        } else {
                            Specialty::ADULT[rng.random_range(0..Specialty::ADULT.len())]
                        };
                        send_log(
                            &log,
                            state.elapsed_secs(),
                            format!("patient {} triaged {color} -> {specialty}", patient.id),
                        );
                        let id = patient.id;
                        if let Some(q) = specialist_queues.get(&specialty) {
                            q.push(color, SpecialistMsg { patient, color, specialty });
                        }
                        let _ = state.triage_replies.reply(id, TriageOutcome::Routed { color, specialty });
                    }
                }
            }
            None => {
                if shutdown.is_signalled() && queue.is_empty() {
                    return;
                }
            }
        }
    }
}
