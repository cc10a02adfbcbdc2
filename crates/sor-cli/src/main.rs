//! Command-line front end: parses arguments into a validated `Config`,
//! wires up `SIGINT`/interactive-key shutdown, runs the simulation, and
//! maps failures to a nonzero exit code.

mod keys;

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;

use sor_rt::{ShutdownSignal, SignalKind};
use sor_sim::SimError;
use sor_types::{CliArgs, Config};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(summary) => {
            tracing::info!(
                patients_discharged = summary.patients_discharged,
                ran_for = ?summary.ran_for,
                "simulation finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("sor-sim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<sor_sim::SimSummary, SimError> {
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    let log_path = std::env::var_os("SOR_LOG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("sor-sim.log"));

    let shutdown = Arc::new(ShutdownSignal::new());
    let state_slot: Arc<Mutex<Option<Arc<sor_sim::SharedState>>>> = Arc::new(Mutex::new(None));

    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.signal(SignalKind::Shutdown))
            .unwrap_or_else(|err| tracing::warn!(?err, "failed to install Ctrl-C handler"));
    }

    let key_thread = keys::spawn(Arc::clone(&shutdown), Arc::clone(&state_slot));

    let summary = sor_sim::run(config, log_path, Arc::clone(&shutdown), move |state| {
        *state_slot.lock().unwrap() = Some(state);
    });

    shutdown.signal(SignalKind::Shutdown);
    let _ = key_thread.join();

    Ok(summary)
}
