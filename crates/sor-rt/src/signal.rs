//! Sticky interrupt flags and cooperative shutdown/evacuation signaling.
//!
//! Three termination modes: a normal cooperative shutdown, a targeted
//! interrupt aimed at one specialist, and a mass evacuation aimed at
//! everyone. The interrupt flag is checked only at safe points (between
//! patients, between sleep chunks) — never mid-examination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A sticky, single-bit interrupt aimed at one worker (the director
/// calling a specific specialist away).
pub struct InterruptFlag {
    flagged: AtomicBool,
}

impl InterruptFlag {
    pub fn new() -> Self {
        InterruptFlag { flagged: AtomicBool::new(false) }
    }

    pub fn raise(&self) {
        self.flagged.store(true, Ordering::SeqCst);
    }

    /// Clears and returns the flag's previous value, for use at a safe point.
    pub fn take(&self) -> bool {
        self.flagged.swap(false, Ordering::SeqCst)
    }

    pub fn is_set(&self) -> bool {
        self.flagged.load(Ordering::SeqCst)
    }
}

impl Default for InterruptFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The three distinct signal levels a worker can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    None,
    Shutdown,
    Evacuate,
}

/// A global, sticky shutdown/evacuate signal with condvar-driven wake so
/// sleeping workers don't have to poll for it.
pub struct ShutdownSignal {
    state: Mutex<SignalKind>,
    cond: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        ShutdownSignal {
            state: Mutex::new(SignalKind::None),
            cond: Condvar::new(),
        }
    }

    /// Raises the signal if none has been raised yet. First signal wins:
    /// once a shutdown or evacuation has been requested it is never
    /// downgraded or replaced.
    pub fn signal(&self, kind: SignalKind) {
        let mut state = self.state.lock();
        if *state == SignalKind::None {
            *state = kind;
            self.cond.notify_all();
        }
    }

    pub fn current(&self) -> SignalKind {
        *self.state.lock()
    }

    pub fn is_signalled(&self) -> bool {
        self.current() != SignalKind::None
    }

    /// Sleeps up to `dur`, waking early if a signal arrives. Returns the
    /// signal if one arrived, `None` if the full duration elapsed first.
    pub fn sleep(&self, dur: Duration) -> Option<SignalKind> {
        let mut state = self.state.lock();
        if *state != SignalKind::None {
            return Some(*state);
        }
        self.cond.wait_for(&mut state, dur);
        if *state != SignalKind::None {
            Some(*state)
        } else {
            None
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn interrupt_flag_take_clears_it() {
        let flag = InterruptFlag::new();
        flag.raise();
        assert!(flag.take());
        assert!(!flag.is_set());
    }

    #[test]
    fn shutdown_signal_first_wins() {
        let sig = ShutdownSignal::new();
        sig.signal(SignalKind::Shutdown);
        sig.signal(SignalKind::Evacuate);
        assert_eq!(sig.current(), SignalKind::Shutdown);
    }

    #[test]
    fn sleep_returns_none_on_timeout_without_signal() {
        let sig = ShutdownSignal::new();
        let woken = sig.sleep(Duration::from_millis(10));
        assert!(woken.is_none());
    }

    #[test]
    fn sleep_wakes_early_on_signal() {
        let sig = Arc::new(ShutdownSignal::new());
        let sig2 = Arc::clone(&sig);
        let handle = thread::spawn(move || sig2.sleep(Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(20));
        sig.signal(SignalKind::Evacuate);
        let woken = handle.join().unwrap();
        assert_eq!(woken, Some(SignalKind::Evacuate));
    }
}
