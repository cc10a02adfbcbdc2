//! Typed envelopes carried on the `sor-rt` channels between components.
//!
//! Plain typed enums/structs rather than byte buffers: these workers are
//! ordinary Rust threads sharing an address space, not coroutines crossing
//! an FFI boundary, so there is nothing to serialize on the hot path.

use crate::model::{Color, PatientRecord, Specialty};

/// A patient waiting to be called to a registration window.
#[derive(Debug, Clone)]
pub struct RegistrationMsg {
    pub patient: PatientRecord,
}

/// A registered patient handed off to triage.
#[derive(Debug, Clone)]
pub struct TriageMsg {
    pub patient: PatientRecord,
}

/// A triaged patient handed to a specific specialist's queue.
///
/// `color` doubles as the priority key the specialist's per-class FIFO
/// queues sort on (Red before Yellow before Green, FIFO within a class).
#[derive(Debug, Clone)]
pub struct SpecialistMsg {
    pub patient: PatientRecord,
    pub color: Color,
    pub specialty: Specialty,
}

/// What triage replies to the waiting patient with: either a discharge, or
/// the color/specialty the patient was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageOutcome {
    SentHome,
    Routed { color: Color, specialty: Specialty },
}

/// A line destined for the simulated event log, pre-formatted to the
/// `[%7.2fs] <message>` wire format.
#[derive(Debug, Clone)]
pub struct LogMsg {
    pub sim_time_secs: f64,
    pub text: String,
}

impl LogMsg {
    pub fn new(sim_time_secs: f64, text: impl Into<String>) -> Self {
        LogMsg { sim_time_secs, text: text.into() }
    }

    /// Renders the `[%7.2fs] <message>` line exactly as the Logger writes it.
    pub fn render(&self) -> String {
        format!("[{:7.2}s] {}", self.sim_time_secs, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_msg_render_matches_wire_format() {
        let msg = LogMsg::new(12.3, "patient #4 registered");
        assert_eq!(msg.render(), "[  12.30s] patient #4 registered");
    }
}
