//! A counting semaphore supporting atomic multi-unit acquire/release.
//!
//! The waitroom seat pool needs this: a minor arriving with a guardian must
//! either claim both seats together or neither — two independent
//! single-unit acquires could interleave and deadlock two such patients
//! against each other, each holding one seat and waiting for the second.
//! `acquire_n` blocks until the full count is available and takes it in one
//! critical section, closing that window.

use parking_lot::{Condvar, Mutex};

pub struct CountingSemaphore {
    count: Mutex<u32>,
    cond: Condvar,
}

impl CountingSemaphore {
    pub fn new(initial: u32) -> Self {
        CountingSemaphore {
            count: Mutex::new(initial),
            cond: Condvar::new(),
        }
    }

    pub fn acquire(&self) {
        self.acquire_n(1);
    }

    pub fn release(&self) {
        self.release_n(1);
    }

    /// Blocks until `n` units are available, then takes all `n` atomically.
    pub fn acquire_n(&self, n: u32) {
        let mut count = self.count.lock();
        while *count < n {
            self.cond.wait(&mut count);
        }
        *count -= n;
    }

    /// Takes `n` units only if they are all available right now.
    pub fn try_acquire_n(&self, n: u32) -> bool {
        let mut count = self.count.lock();
        if *count >= n {
            *count -= n;
            true
        } else {
            false
        }
    }

    pub fn release_n(&self, n: u32) {
        let mut count = self.count.lock();
        *count += n;
        self.cond.notify_all();
    }

    pub fn available(&self) -> u32 {
        *self.count.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn acquire_and_release_round_trip() {
        let sem = CountingSemaphore::new(5);
        sem.acquire_n(3);
        assert_eq!(sem.available(), 2);
        sem.release_n(3);
        assert_eq!(sem.available(), 5);
    }

    #[test]
    fn try_acquire_fails_when_insufficient() {
        let sem = CountingSemaphore::new(1);
        assert!(!sem.try_acquire_n(2));
        assert_eq!(sem.available(), 1);
    }

    #[test]
    fn acquire_n_blocks_until_all_units_available() {
        let sem = Arc::new(CountingSemaphore::new(1));
        let sem2 = Arc::clone(&sem);
        let handle = thread::spawn(move || {
            sem2.acquire_n(2);
        });
        thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());
        sem.release_n(1);
        handle.join().unwrap();
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn two_unit_requests_do_not_deadlock_each_other() {
        // Two waiters each need 2 units out of a pool of 2; only one seat
        // is freed at a time by a third thread, exercising the all-or-
        // nothing path that a pair of 1-unit acquires would not guarantee.
        let sem = Arc::new(CountingSemaphore::new(2));
        let a = Arc::clone(&sem);
        let b = Arc::clone(&sem);
        let ha = thread::spawn(move || a.acquire_n(2));
        let hb = thread::spawn(move || b.acquire_n(2));
        thread::sleep(Duration::from_millis(10));
        sem.release_n(2);
        ha.join().unwrap();
        hb.join().unwrap();
    }
}
