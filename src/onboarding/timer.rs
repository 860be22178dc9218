//! Cancelable delayed tasks
//!
//! Two halves: [`Generation`] lives inside a flow and decides whether a
//! timer that fired is still the latest one; [`TimerSlots`] lives in the
//! host and owns the tokio tasks, aborting the old task when a slot is
//! rescheduled. An event that slips past the abort still carries a stale
//! generation and is dropped by the flow.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Monotonic counter identifying the latest scheduled request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    current: u64,
    pending: bool,
}

impl Generation {
    /// Start a new request, invalidating any pending one
    pub fn schedule(&mut self) -> u64 {
        self.current += 1;
        self.pending = true;
        self.current
    }

    /// Invalidate the pending request, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.current += 1;
        self.pending = false;
        true
    }

    /// Accept a completion for `generation`. Only the latest pending request
    /// settles; anything else is stale.
    pub fn settle(&mut self, generation: u64) -> bool {
        if self.pending && generation == self.current {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Generation of the request still waiting to fire
    pub fn pending(&self) -> Option<u64> {
        self.pending.then_some(self.current)
    }
}

/// Host-side registry of running timers, one per key
#[derive(Debug)]
pub struct TimerSlots<K: Eq + Hash + Copy + Debug> {
    slots: HashMap<K, JoinHandle<()>>,
}

impl<K: Eq + Hash + Copy + Debug> Default for TimerSlots<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy + Debug> TimerSlots<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fire` after `delay`, replacing whatever was scheduled under `key`.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, key: K, delay: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel(key) {
            tracing::debug!("[timer] {:?} rescheduled, previous task aborted", key);
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        });
        self.slots.insert(key, handle);
    }

    /// Abort the task under `key`. Returns whether it was still running.
    pub fn cancel(&mut self, key: K) -> bool {
        match self.slots.remove(&key) {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, key: K) -> bool {
        self.slots.get(&key).is_some_and(|h| !h.is_finished())
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.slots.drain() {
            handle.abort();
        }
    }
}

impl<K: Eq + Hash + Copy + Debug> Drop for TimerSlots<K> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
