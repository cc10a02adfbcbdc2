//! The emergency department simulation: one module per component plus
//! the shared state they all operate on.

pub mod channels;
pub mod controller;
pub mod director;
pub mod error;
pub mod generator;
pub mod logger;
pub mod patient;
pub mod reg_controller;
pub mod registration;
pub mod specialist;
pub mod state;
pub mod triage;
pub mod util;

pub use controller::{run, SimSummary};
pub use error::SimError;
pub use state::SharedState;
