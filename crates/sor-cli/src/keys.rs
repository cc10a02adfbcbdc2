//! Interactive raw-mode key handling: digits `1`-`6` interrupt a specific
//! specialist, `7` orders a full evacuation, `q`/`Q` requests a normal
//! shutdown.
//!
//! Grounded on `kimberlite-sim/src/tui`'s raw-mode key reading, since the
//! teacher itself has no interactive terminal surface to draw from.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal;

use sor_rt::{ShutdownSignal, SignalKind};
use sor_sim::SharedState;
use sor_types::Specialty;

/// Restores the terminal to cooked mode on drop, however the key loop
/// exits (normally or via a panic unwinding past it).
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    pub fn enable() -> Self {
        match terminal::enable_raw_mode() {
            Ok(()) => RawModeGuard { enabled: true },
            Err(err) => {
                tracing::warn!(?err, "failed to enable raw terminal mode; interactive keys disabled");
                RawModeGuard { enabled: false }
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Spawns the key-reading thread. `state_slot` is filled in by the
/// simulation once its workers are up (see `sor_sim::controller::run`'s
/// `on_started` hook); until then, digit keys that target a specialist
/// are silently ignored.
pub fn spawn(shutdown: Arc<ShutdownSignal>, state_slot: Arc<Mutex<Option<Arc<SharedState>>>>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("key-reader".into())
        .spawn(move || run(shutdown, state_slot))
        .expect("failed to spawn key-reader thread")
}

fn run(shutdown: Arc<ShutdownSignal>, state_slot: Arc<Mutex<Option<Arc<SharedState>>>>) {
    let _guard = RawModeGuard::enable();
    if !_guard.is_enabled() {
        return;
    }

    while !shutdown.is_signalled() {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                tracing::warn!(?err, "key-reader poll failed");
                return;
            }
        }

        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(?err, "key-reader read failed");
                return;
            }
        };

        let Event::Key(key) = event else { continue };
        match key.code {
            KeyCode::Char(c @ '1'..='6') => {
                let index = c.to_digit(10).unwrap() as usize - 1;
                let specialty = Specialty::ALL[index];
                if let Some(state) = state_slot.lock().unwrap().as_ref() {
                    if let Some(handle) = state.specialists.get(&specialty) {
                        handle.interrupt.raise();
                    }
                }
            }
            KeyCode::Char('7') => {
                shutdown.signal(SignalKind::Evacuate);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                shutdown.signal(SignalKind::Shutdown);
            }
            _ => {}
        }
    }
}
