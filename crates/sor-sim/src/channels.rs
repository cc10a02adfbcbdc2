//! Shared channel type aliases wiring the pipeline together.

use std::sync::Arc;

use sor_rt::{Mailbox, PriorityMailbox};
use sor_types::{Color, RegistrationMsg, TriageMsg};

/// VIP patients (priority key `0`) are read before ordinary patients
/// (priority key `1`), FIFO within each class.
pub type RegistrationQueue = PriorityMailbox<u8, RegistrationMsg>;
pub type TriageQueue = Mailbox<TriageMsg>;
pub type SpecialistQueue = PriorityMailbox<Color, sor_types::SpecialistMsg>;

pub const PRIORITY_VIP: u8 = 0;
pub const PRIORITY_ORDINARY: u8 = 1;

pub fn new_registration_queue() -> Arc<RegistrationQueue> {
    Arc::new(PriorityMailbox::new())
}

pub fn new_triage_queue() -> Arc<TriageQueue> {
    Arc::new(Mailbox::new())
}

pub fn new_specialist_queue() -> Arc<SpecialistQueue> {
    Arc::new(PriorityMailbox::new())
}
