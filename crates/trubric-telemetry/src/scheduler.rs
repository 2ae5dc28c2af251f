//! Background flush worker.
//!
//! A single named thread wakes every tick, checks the size and interval
//! triggers, and flushes when either fires. Stopping is a channel send
//! followed by a join; the worker notices at its next wake at the latest.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use trubric_core::errors::{TelemetryError, TelemetryResult};

use crate::flush::Flusher;

const WORKER_NAME: &str = "trubric-telemetry";

/// Flush triggers, already clamped to their allowed ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    pub flush_at: usize,
    pub flush_interval: Duration,
    pub tick: Duration,
}

#[derive(Debug)]
pub(crate) struct Scheduler {
    stop: Sender<()>,
    worker: JoinHandle<()>,
}

impl Scheduler {
    pub(crate) fn spawn(flusher: Arc<Flusher>, policy: FlushPolicy) -> TelemetryResult<Self> {
        let (stop, stop_rx) = bounded::<()>(1);
        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_owned())
            .spawn(move || {
                tracing::debug!(?policy, "telemetry worker started");
                loop {
                    match stop_rx.recv_timeout(policy.tick) {
                        Err(RecvTimeoutError::Timeout) => {
                            if flusher
                                .queue
                                .should_flush(policy.flush_at, policy.flush_interval)
                            {
                                flusher.flush();
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("telemetry worker stopped");
            })
            .map_err(|error| TelemetryError::WorkerSpawn {
                reason: error.to_string(),
            })?;
        Ok(Self { stop, worker })
    }

    /// Signal the worker and wait for it to exit.
    pub(crate) fn stop(self) {
        // A full or disconnected channel means the worker is already leaving.
        let _ = self.stop.try_send(());
        if let Err(error) = self.worker.join() {
            tracing::warn!(?error, "telemetry worker panicked");
        }
    }
}
