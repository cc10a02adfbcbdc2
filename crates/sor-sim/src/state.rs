//! Process-shared record, mapped to an owned struct behind a lock.
//!
//! `SharedState` bundles everything every worker needs to touch under a
//! single combined lock, to avoid deadlocks and keep related fields
//! consistent with each other. The waitroom seat pool is a separate
//! `CountingSemaphore` (its own lock, acquired before `inner`, never
//! after — see the lock-ordering rule below) because it has its own
//! blocking-wait semantics that don't belong inside a plain mutex.
//!
//! Lock ordering, enforced throughout `sor-sim`: `waitroom` before
//! `inner`, `inner` before any per-queue mailbox lock. No code path may
//! acquire these out of order.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

use sor_rt::{CountingSemaphore, InterruptFlag, ReplyRegistry};
use sor_types::{Config, Outcome, PatientId, Specialty, TriageOutcome};

pub struct Inner {
    /// Patients past the waitroom, currently inside the department proper
    /// (registration through specialist exam).
    pub inside_count: u32,
    pub discharged: Vec<(PatientId, Outcome)>,
}

/// Tracks the registration queue's depth with condvar-driven wake, so the
/// registration controller doesn't have to raw-poll to notice a threshold
/// crossing the way the original prototype's 200ms `usleep` loop did.
pub struct QueueDepthTracker {
    count: Mutex<u32>,
    cond: Condvar,
}

impl QueueDepthTracker {
    pub fn new() -> Self {
        QueueDepthTracker { count: Mutex::new(0), cond: Condvar::new() }
    }

    pub fn increment(&self) {
        let mut c = self.count.lock();
        *c += 1;
        self.cond.notify_all();
    }

    pub fn decrement(&self) {
        let mut c = self.count.lock();
        *c = c.saturating_sub(1);
        self.cond.notify_all();
    }

    pub fn get(&self) -> u32 {
        *self.count.lock()
    }

    /// Waits for the depth to differ from `last_seen`, up to `timeout`.
    /// Returns the current depth either way.
    pub fn wait_for_change(&self, last_seen: u32, timeout: Duration) -> u32 {
        let mut c = self.count.lock();
        if *c != last_seen {
            return *c;
        }
        self.cond.wait_for(&mut c, timeout);
        *c
    }
}

impl Default for QueueDepthTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles specialists register themselves under, so the director can
/// target an interrupt without holding a reference passed down manually.
pub struct SpecialistHandle {
    pub interrupt: std::sync::Arc<InterruptFlag>,
    /// `doctor_on_break[i]`: set for the duration of this specialist's
    /// ward trip (from the moment it's recalled to the moment it's back),
    /// cleared otherwise. No patient's exam may start while this is set.
    pub on_break: AtomicBool,
}

pub struct SharedState {
    pub config: Config,
    pub waitroom: CountingSemaphore,
    pub inner: Mutex<Inner>,
    pub specialists: FxHashMap<Specialty, SpecialistHandle>,
    pub next_patient_id: AtomicU64,
    pub start: Instant,
    pub registration_depth: QueueDepthTracker,
    pub window2_active: AtomicBool,
    /// A patient's three per-stage reply channels, each keyed by patient
    /// id: one registration-reply, one triage-reply, one specialist-reply,
    /// mirroring the three distinct reply-tag bases the wire format uses.
    pub registration_replies: ReplyRegistry<PatientId, ()>,
    pub triage_replies: ReplyRegistry<PatientId, TriageOutcome>,
    pub specialist_replies: ReplyRegistry<PatientId, Outcome>,
}

impl SharedState {
    pub fn new(config: Config, specialists: FxHashMap<Specialty, SpecialistHandle>) -> Self {
        let n = config.n;
        SharedState {
            config,
            waitroom: CountingSemaphore::new(n),
            inner: Mutex::new(Inner { inside_count: 0, discharged: Vec::new() }),
            specialists,
            next_patient_id: AtomicU64::new(1),
            start: Instant::now(),
            registration_depth: QueueDepthTracker::new(),
            window2_active: AtomicBool::new(false),
            registration_replies: ReplyRegistry::new(),
            triage_replies: ReplyRegistry::new(),
            specialist_replies: ReplyRegistry::new(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn next_patient_id(&self) -> PatientId {
        PatientId(self.next_patient_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Called once a patient has claimed its waitroom seat(s); `seats` is
    /// 2 for a minor with a guardian, 1 otherwise.
    pub fn record_admission(&self, seats: u32) {
        self.inner.lock().inside_count += seats;
    }

    /// Called once a patient's journey ends (sent home by triage, or
    /// discharged by a specialist); `seats` must match the value passed
    /// to the matching `record_admission`.
    pub fn record_discharge(&self, id: PatientId, outcome: Outcome, seats: u32) {
        let mut inner = self.inner.lock();
        inner.inside_count = inner.inside_count.saturating_sub(seats);
        inner.discharged.push((id, outcome));
    }

    pub fn discharged_count(&self) -> usize {
        self.inner.lock().discharged.len()
    }
}
