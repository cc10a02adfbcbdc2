//! A patient's entry into the waitroom and handoff to registration.
//!
//! A minor arriving with a guardian needs two waitroom seats claimed
//! together, never one-at-a-time (two patients each holding one seat
//! while waiting on a second would deadlock). `sor_rt::CountingSemaphore`
//! gives us the atomic `acquire_n`, but the domain still models the
//! guardian as a second party: two cooperating `std::thread`s rendezvous
//! on a one-shot `Condvar` before the seat request is made, then the
//! guardian thread exits once seated (its role ends at the waitroom
//! door — it doesn't go through registration/triage/specialist).

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use parking_lot::{Condvar, Mutex};

use sor_types::{LogMsg, PatientRecord, RegistrationMsg, TriageOutcome};

use crate::channels::{RegistrationQueue, PRIORITY_ORDINARY, PRIORITY_VIP};
use crate::state::SharedState;
use crate::util::send_log;

pub fn spawn(
    state: Arc<SharedState>,
    registration: Arc<RegistrationQueue>,
    patient: PatientRecord,
    log: Sender<LogMsg>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("patient-{}", patient.id))
        .spawn(move || run(state, registration, patient, log))
        .expect("failed to spawn patient thread")
}

fn run(state: Arc<SharedState>, registration: Arc<RegistrationQueue>, patient: PatientRecord, log: Sender<LogMsg>) {
    let seats = patient.waitroom_seats();

    if patient.is_minor && patient.has_guardian {
        let rendezvous = Arc::new((Mutex::new(false), Condvar::new()));
        let rendezvous2 = Arc::clone(&rendezvous);
        let guardian = thread::Builder::new()
            .name(format!("guardian-of-{}", patient.id))
            .spawn(move || {
                let (seated, cond) = &*rendezvous2;
                let mut seated = seated.lock();
                while !*seated {
                    cond.wait(&mut seated);
                }
            })
            .expect("failed to spawn guardian thread");

        state.waitroom.acquire_n(seats);
        send_log(&log, state.elapsed_secs(), format!("patient {} and guardian take waitroom seats", patient.id));
        {
            let (seated, cond) = &*rendezvous;
            *seated.lock() = true;
            cond.notify_all();
        }
        guardian.join().expect("guardian thread panicked");
    } else {
        state.waitroom.acquire_n(seats);
        send_log(&log, state.elapsed_secs(), format!("patient {} takes a waitroom seat", patient.id));
    }

    state.record_admission(seats);

    // Registered for all three reply channels before the first request is
    // sent, so a stage that replies quickly can never race ahead of this
    // thread's next registration.
    let id = patient.id;
    let registration_reply = state.registration_replies.register(id);
    let triage_reply = state.triage_replies.register(id);
    let specialist_reply = state.specialist_replies.register(id);

    state.registration_depth.increment();
    let key = if patient.is_vip { PRIORITY_VIP } else { PRIORITY_ORDINARY };
    registration.push(key, RegistrationMsg { patient });

    if registration_reply.recv().is_err() {
        return;
    }

    let outcome = match triage_reply.recv() {
        Ok(outcome) => outcome,
        Err(_) => return,
    };

    match outcome {
        TriageOutcome::SentHome => {
            state.specialist_replies.cancel(&id);
        }
        TriageOutcome::Routed { .. } => {
            if let Ok(outcome) = specialist_reply.recv() {
                send_log(&log, state.elapsed_secs(), format!("patient {id} leaves the department: {outcome}"));
            }
        }
    }
}
