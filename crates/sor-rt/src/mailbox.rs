//! FIFO and priority mailboxes.
//!
//! `Mailbox<T>` is a blocking FIFO queue, directly grounded on the
//! teacher's `Mutex<VecDeque<T>>` mailbox shape. `PriorityMailbox<K, T>`
//! generalizes it into per-key FIFO queues drained lowest-key-first, which
//! is how a specialist reads Red patients before Yellow before Green while
//! staying FIFO within a color.

use std::collections::{BTreeMap, VecDeque};

use parking_lot::{Condvar, Mutex};

pub struct Mailbox<T> {
    queue: Mutex<VecDeque<T>>,
    cond: Condvar,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Mailbox {
            queue: Mutex::new(VecDeque::new()),
            cond: Condvar::new(),
        }
    }

    pub fn push(&self, item: T) {
        let mut q = self.queue.lock();
        q.push_back(item);
        self.cond.notify_one();
    }

    /// Blocks until an item is available, then pops it.
    pub fn pop(&self) -> T {
        let mut q = self.queue.lock();
        loop {
            if let Some(item) = q.pop_front() {
                return item;
            }
            self.cond.wait(&mut q);
        }
    }

    pub fn try_pop(&self) -> Option<T> {
        self.queue.lock().pop_front()
    }

    /// Waits up to `timeout` for an item, returning `None` if none arrives.
    /// Lets a worker check an interrupt/shutdown flag at a bounded cadence
    /// instead of blocking on `pop` forever or busy-polling `try_pop`.
    pub fn pop_timeout(&self, timeout: std::time::Duration) -> Option<T> {
        let mut q = self.queue.lock();
        if let Some(item) = q.pop_front() {
            return Some(item);
        }
        self.cond.wait_for(&mut q, timeout);
        q.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A mailbox with per-key FIFO ordering, drained lowest-key-first.
///
/// `K` is the priority class (e.g. triage color); ties within a class are
/// broken by arrival order.
pub struct PriorityMailbox<K: Ord + Clone, T> {
    queues: Mutex<BTreeMap<K, VecDeque<T>>>,
    cond: Condvar,
}

impl<K: Ord + Clone, T> PriorityMailbox<K, T> {
    pub fn new() -> Self {
        PriorityMailbox {
            queues: Mutex::new(BTreeMap::new()),
            cond: Condvar::new(),
        }
    }

    pub fn push(&self, key: K, item: T) {
        let mut qs = self.queues.lock();
        qs.entry(key).or_default().push_back(item);
        self.cond.notify_one();
    }

    /// Blocks until some queue is non-empty, then pops from the
    /// lowest-key non-empty queue (`BTreeMap` iterates keys in order).
    pub fn pop(&self) -> (K, T) {
        let mut qs = self.queues.lock();
        loop {
            if let Some((key, queue)) = qs.iter_mut().find(|(_, q)| !q.is_empty()) {
                let key = key.clone();
                let item = queue.pop_front().expect("checked non-empty above");
                return (key, item);
            }
            self.cond.wait(&mut qs);
        }
    }

    pub fn try_pop(&self) -> Option<(K, T)> {
        let mut qs = self.queues.lock();
        let (key, queue) = qs.iter_mut().find(|(_, q)| !q.is_empty())?;
        let key = key.clone();
        let item = queue.pop_front()?;
        Some((key, item))
    }

    /// Waits up to `timeout` for the highest-priority item, returning
    /// `None` if none arrives in time.
    pub fn pop_timeout(&self, timeout: std::time::Duration) -> Option<(K, T)> {
        let mut qs = self.queues.lock();
        if let Some((key, queue)) = qs.iter_mut().find(|(_, q)| !q.is_empty()) {
            let key = key.clone();
            if let Some(item) = queue.pop_front() {
                return Some((key, item));
            }
        }
        self.cond.wait_for(&mut qs, timeout);
        let (key, queue) = qs.iter_mut().find(|(_, q)| !q.is_empty())?;
        let key = key.clone();
        let item = queue.pop_front()?;
        Some((key, item))
    }

    pub fn len(&self) -> usize {
        self.queues.lock().values().map(|q| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord + Clone, T> Default for PriorityMailbox<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
