//! Shared data model, configuration, and message envelopes for the
//! emergency department concurrency simulation.

pub mod config;
pub mod messages;
pub mod model;

pub use config::{CliArgs, Config, ConfigError};
pub use messages::{LogMsg, RegistrationMsg, SpecialistMsg, TriageMsg, TriageOutcome};
pub use model::{Color, Outcome, PatientId, PatientRecord, Specialty};
