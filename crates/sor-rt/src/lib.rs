//! The concurrency kernel: counting semaphore, FIFO/priority mailboxes,
//! reply correlation, and cooperative signaling.

pub mod mailbox;
pub mod reply;
pub mod semaphore;
pub mod signal;

pub use mailbox::{Mailbox, PriorityMailbox};
pub use reply::{NoSuchPending, ReplyRegistry};
pub use semaphore::CountingSemaphore;
pub use signal::{InterruptFlag, ShutdownSignal, SignalKind};
