//! Per-key reply correlation.
//!
//! A caller registers under a correlation key (a patient id) to get back a
//! one-shot `crossbeam_channel::Receiver`, then blocks on `Receiver::recv`
//! directly. The replying side looks the key up and sends through the
//! matching `Sender` — plain `std::thread`s, no spin-waiting. The entry is
//! removed as soon as a reply is sent; a caller that never needs a reply
//! (e.g. a patient sent home before reaching a specialist) calls `cancel`
//! instead to drop its unused registration.

use std::fmt;
use std::hash::Hash;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

pub struct ReplyRegistry<K: Eq + Hash, V> {
    pending: Mutex<FxHashMap<K, Sender<V>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoSuchPending;

impl fmt::Display for NoSuchPending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no pending reply registered for this key")
    }
}

impl std::error::Error for NoSuchPending {}

impl<K: Eq + Hash, V> ReplyRegistry<K, V> {
    pub fn new() -> Self {
        ReplyRegistry { pending: Mutex::new(FxHashMap::default()) }
    }

    /// Registers `key`, returning the receiver side of its reply channel.
    /// Overwrites (and silently drops) any prior unclaimed registration
    /// for the same key.
    pub fn register(&self, key: K) -> Receiver<V> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.pending.lock().insert(key, tx);
        rx
    }

    /// Delivers `value` to whoever registered `key`, consuming the
    /// registration. Fails if nothing is pending for `key`, e.g. because
    /// the caller never registered or already received its reply.
    pub fn reply(&self, key: K, value: V) -> Result<(), NoSuchPending> {
        let tx = self.pending.lock().remove(&key).ok_or(NoSuchPending)?;
        let _ = tx.send(value);
        Ok(())
    }

    /// Drops a registration nobody will ever `recv` on.
    pub fn cancel(&self, key: &K) {
        self.pending.lock().remove(key);
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash, V> Default for ReplyRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
