//! Registration window-2 hysteresis: open at `queue_len >= k_open`, close
//! at `queue_len < k_close`.
//!
//! Waits on a condvar over `SharedState::registration_depth` rather than
//! polling on a fixed interval; 200ms survives only as the wait's
//! timeout, a safety net against missed wakeups, not the sole trigger.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;

use sor_rt::ShutdownSignal;
use sor_types::LogMsg;

use crate::state::SharedState;
use crate::util::send_log;

const POLL_TIMEOUT: Duration = Duration::from_millis(200);

pub fn spawn(state: Arc<SharedState>, shutdown: Arc<ShutdownSignal>, log: Sender<LogMsg>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("reg-controller".into())
        .spawn(move || run(state, shutdown, log))
        .expect("failed to spawn registration controller thread")
}

fn run(state: Arc<SharedState>, shutdown: Arc<ShutdownSignal>, log: Sender<LogMsg>) {
    let mut last_seen = state.registration_depth.get();
    loop {
        if shutdown.is_signalled() {
            return;
        }
        let qlen = state.registration_depth.wait_for_change(last_seen, POLL_TIMEOUT);
        last_seen = qlen;

        let open = state.window2_active.load(Ordering::SeqCst);
        if !open && qlen >= state.config.k_open {
            state.window2_active.store(true, Ordering::SeqCst);
            send_log(&log, state.elapsed_secs(), "registration window 2 opened");
        } else if open && qlen < state.config.k_close {
            state.window2_active.store(false, Ordering::SeqCst);
            send_log(&log, state.elapsed_secs(), "registration window 2 closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sor_types::{CliArgs, Config};

    fn state_with(n: u32, k: u32) -> Arc<SharedState> {
        let cfg = Config::try_from(CliArgs {
            n,
            k: Some(k),
            duration: 0,
            speed: 1.0,
            seed: Some(1),
            interval: 1.0,
        })
        .unwrap();
        Arc::new(SharedState::new(cfg, Default::default()))
    }

    #[test]
    fn opens_window2_once_threshold_reached() {
        let state = state_with(20, 10);
        let shutdown = Arc::new(ShutdownSignal::new());
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = spawn(Arc::clone(&state), Arc::clone(&shutdown), tx);

        for _ in 0..10 {
            state.registration_depth.increment();
        }
        // allow the controller to observe the change
        for _ in 0..50 {
            if state.window2_active.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(state.window2_active.load(Ordering::SeqCst));

        shutdown.signal(sor_rt::SignalKind::Shutdown);
        handle.join().unwrap();
        assert!(rx.try_iter().any(|m| m.text.contains("opened")));
    }

    #[test]
    fn closes_window2_below_close_threshold() {
        let state = state_with(30, 15);
        state.window2_active.store(true, Ordering::SeqCst);
        for _ in 0..20 {
            state.registration_depth.increment();
        }
        let shutdown = Arc::new(ShutdownSignal::new());
        let (tx, _rx) = crossbeam_channel::unbounded();
        let handle = spawn(Arc::clone(&state), Arc::clone(&shutdown), tx);

        for _ in 0..18 {
            state.registration_depth.decrement();
        }
        for _ in 0..50 {
            if !state.window2_active.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!state.window2_active.load(Ordering::SeqCst));

        shutdown.signal(sor_rt::SignalKind::Shutdown);
        handle.join().unwrap();
    }
}
