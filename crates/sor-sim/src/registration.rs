//! Registration desk: one or two windows draining the registration queue,
//! VIP-front/ordinary-back, each taking a fixed speed-scaled service time
//! before handing the patient to triage.
//!
//! Each window blocks on the priority mailbox's pop, then sleeps a fixed,
//! speed-scaled 500ms before handing the patient on to triage.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;

use sor_rt::ShutdownSignal;
use sor_types::{LogMsg, TriageMsg};

use crate::channels::{RegistrationQueue, TriageQueue};
use crate::state::SharedState;
use crate::util::{chunked_sleep, send_log};

const REGISTRATION_SECS: f64 = 0.5;
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Whether a window is always open, or gated by the registration
/// controller's `SharedState::window2_active` hysteresis flag.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Gating {
    AlwaysOpen,
    GatedByController,
}

pub fn spawn(
    window_id: u8,
    gating: Gating,
    state: Arc<SharedState>,
    queue: Arc<RegistrationQueue>,
    triage_out: Arc<TriageQueue>,
    shutdown: Arc<ShutdownSignal>,
    log: Sender<LogMsg>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("registration-w{window_id}"))
        .spawn(move || run(window_id, gating, state, queue, triage_out, shutdown, log))
        .expect("failed to spawn registration window thread")
}

fn run(
    window_id: u8,
    gating: Gating,
    state: Arc<SharedState>,
    queue: Arc<RegistrationQueue>,
    triage_out: Arc<TriageQueue>,
    shutdown: Arc<ShutdownSignal>,
    log: Sender<LogMsg>,
) {
    loop {
        if gating == Gating::GatedByController && !state.window2_active.load(Ordering::SeqCst) {
            if shutdown.is_signalled() {
                return;
            }
            thread::sleep(IDLE_POLL);
            continue;
        }

        match queue.pop_timeout(IDLE_POLL) {
            Some((_, msg)) => {
                state.registration_depth.decrement();
                let secs = state.config.scaled_secs(REGISTRATION_SECS);
                chunked_sleep(secs, &shutdown);
                send_log(
                    &log,
                    state.elapsed_secs(),
                    format!("patient {} registered at window {window_id}", msg.patient.id),
                );
                let id = msg.patient.id;
                triage_out.push(TriageMsg { patient: msg.patient });
                let _ = state.registration_replies.reply(id, ());
            }
            None => {
                if shutdown.is_signalled() && queue.is_empty() {
                    return;
                }
            }
        }
    }
}
