//! Small helpers shared by every worker module: chunked interruptible
//! sleeps and the boilerplate of pushing a formatted line to the logger.

use std::time::Duration;

use crossbeam_channel::Sender;

use sor_rt::{ShutdownSignal, SignalKind};
use sor_types::LogMsg;

/// Worker identity tags, XORed into the base seed so each worker's RNG
/// stream is independent of how threads happen to interleave.
pub const TAG_GENERATOR: u64 = 1;
pub const TAG_TRIAGE: u64 = 2;
pub const TAG_DIRECTOR: u64 = 5;
pub const TAG_SPECIALIST_BASE: u64 = 100;

const SLEEP_CHUNK: Duration = Duration::from_millis(100);

/// Sleeps for `secs`, in chunks, returning early with the signal if a
/// shutdown/evacuation arrives mid-sleep. Used for treatment/registration
/// durations that must not block teardown indefinitely.
pub fn chunked_sleep(secs: f64, shutdown: &ShutdownSignal) -> Option<SignalKind> {
    if secs <= 0.0 {
        return None;
    }
    let mut remaining = Duration::from_secs_f64(secs);
    loop {
        let step = remaining.min(SLEEP_CHUNK);
        if let Some(kind) = shutdown.sleep(step) {
            return Some(kind);
        }
        if step >= remaining {
            return None;
        }
        remaining -= step;
    }
}

pub fn send_log(log: &Sender<LogMsg>, sim_time_secs: f64, text: impl Into<String>) {
    let _ = log.send(LogMsg::new(sim_time_secs, text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn chunked_sleep_runs_full_duration_without_signal() {
        let shutdown = ShutdownSignal::new();
        let start = std::time::Instant::now();
        assert!(chunked_sleep(0.05, &shutdown).is_none());
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn chunked_sleep_returns_early_on_signal() {
        let shutdown = Arc::new(ShutdownSignal::new());
        let shutdown2 = Arc::clone(&shutdown);
        let handle = thread::spawn(move || chunked_sleep(5.0, &shutdown2));
        thread::sleep(Duration::from_millis(20));
        shutdown.signal(SignalKind::Shutdown);
        assert_eq!(handle.join().unwrap(), Some(SignalKind::Shutdown));
    }
}
