//! One flush cycle: snapshot the queue, post outside the lock, retry once.

use std::sync::Arc;
use std::time::Duration;

use trubric_core::flush_span;

use crate::events::Event;
use crate::queue::EventQueue;
use crate::transport::Transport;

/// Attempts made by the single retry policy.
const MAX_ATTEMPTS: u32 = 2;

/// What one call to flush did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Events taken off the queue. Zero when there was nothing to send or
    /// another flush was in flight.
    pub events: usize,
    /// Publish attempts, at most two.
    pub attempts: u32,
    pub delivered: bool,
}

impl FlushReport {
    pub fn is_noop(&self) -> bool {
        self.attempts == 0
    }
}

/// Owns the queue-to-transport path shared by the client and the worker.
pub(crate) struct Flusher {
    pub(crate) queue: EventQueue,
    transport: Arc<dyn Transport>,
    retry_backoff: Duration,
}

impl Flusher {
    pub(crate) fn new(transport: Arc<dyn Transport>, retry_backoff: Duration) -> Self {
        Self {
            queue: EventQueue::new(),
            transport,
            retry_backoff,
        }
    }

    /// Send everything queued. A failed batch is retried once after the
    /// backoff, then logged and dropped; it is never re-queued.
    pub(crate) fn flush(&self) -> FlushReport {
        match self.queue.begin_flush() {
            Some(events) => self.send(events),
            None => FlushReport::default(),
        }
    }

    /// Wait out any flush in flight, then send what is left.
    pub(crate) fn drain(&self) -> FlushReport {
        match self.queue.begin_final_flush() {
            Some(events) => self.send(events),
            None => FlushReport::default(),
        }
    }

    fn send(&self, events: Vec<Event>) -> FlushReport {
        let _span = flush_span!(events.len()).entered();
        tracing::info!(event_count = events.len(), "flushing events");

        let mut report = FlushReport {
            events: events.len(),
            ..FlushReport::default()
        };
        while report.attempts < MAX_ATTEMPTS && !report.delivered {
            if report.attempts > 0 {
                tracing::info!(
                    event_count = events.len(),
                    backoff_ms = self.retry_backoff.as_millis() as u64,
                    "retrying flush"
                );
                std::thread::sleep(self.retry_backoff);
            }
            report.attempts += 1;
            match self.transport.publish(&events) {
                Ok(()) => report.delivered = true,
                Err(error) => tracing::error!(
                    event_count = events.len(),
                    attempt = report.attempts,
                    %error,
                    "error flushing events"
                ),
            }
        }
        if !report.delivered {
            tracing::error!(event_count = events.len(), "dropping undeliverable batch");
        }

        self.queue.end_flush();
        report
    }
}
