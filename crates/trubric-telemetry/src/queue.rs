//! The shared event queue and its flush bookkeeping.
//!
//! One mutex guards the events, the in-flight flag, and the time of the
//! last flush. It is held only for in-memory work: a flush swaps the
//! events out and releases the lock before any network call. The `idle`
//! condvar is signalled whenever a flush ends.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::events::Event;

#[derive(Debug)]
struct QueueState {
    events: Vec<Event>,
    is_flushing: bool,
    last_flush: Instant,
}

#[derive(Debug)]
pub struct EventQueue {
    state: Mutex<QueueState>,
    idle: Condvar,
}

/// A poisoned lock only means another thread panicked mid-append; the
/// events themselves are still well formed.
fn lock_or_recover(mutex: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                events: Vec::new(),
                is_flushing: false,
                last_flush: Instant::now(),
            }),
            idle: Condvar::new(),
        }
    }

    /// Append events in order. Returns the new queue length.
    pub fn push(&self, events: impl IntoIterator<Item = Event>) -> usize {
        let mut state = lock_or_recover(&self.state);
        state.events.extend(events);
        state.events.len()
    }

    pub fn len(&self) -> usize {
        lock_or_recover(&self.state).events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_flushing(&self) -> bool {
        lock_or_recover(&self.state).is_flushing
    }

    /// Whether a non-empty queue has reached `flush_at` events or gone
    /// `flush_interval` without a flush.
    pub fn should_flush(&self, flush_at: usize, flush_interval: Duration) -> bool {
        let state = lock_or_recover(&self.state);
        !state.events.is_empty()
            && (state.events.len() >= flush_at || state.last_flush.elapsed() >= flush_interval)
    }

    /// Take every queued event and mark a flush in flight. `None` when the
    /// queue is empty or another flush already holds the batch.
    pub fn begin_flush(&self) -> Option<Vec<Event>> {
        let mut state = lock_or_recover(&self.state);
        if state.is_flushing || state.events.is_empty() {
            return None;
        }
        state.is_flushing = true;
        Some(std::mem::take(&mut state.events))
    }

    /// Like [`begin_flush`](Self::begin_flush), but waits for an in-flight
    /// flush to end instead of giving up. Used on shutdown so events queued
    /// behind a running flush still go out.
    pub fn begin_final_flush(&self) -> Option<Vec<Event>> {
        let mut state = lock_or_recover(&self.state);
        while state.is_flushing {
            state = self
                .idle
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.events.is_empty() {
            return None;
        }
        state.is_flushing = true;
        Some(std::mem::take(&mut state.events))
    }

    /// Clear the in-flight flag and restart the interval clock.
    pub fn end_flush(&self) {
        let mut state = lock_or_recover(&self.state);
        state.is_flushing = false;
        state.last_flush = Instant::now();
        self.idle.notify_all();
    }
}
