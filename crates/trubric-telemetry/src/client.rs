//! TelemetryClient: the public surface used at instrumentation call sites.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use trubric_core::config::defaults::{MAX_FLUSH_AT, MIN_FLUSH_INTERVAL_SECS};
use trubric_core::config::TelemetryConfig;
use trubric_core::errors::{TelemetryError, TelemetryResult};

use crate::events::{LlmRequest, TrackRequest};
use crate::flush::{FlushReport, Flusher};
use crate::scheduler::{FlushPolicy, Scheduler};
use crate::transport::{HttpTransport, Transport};

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clamp the configured triggers, warning about every adjusted value.
fn flush_policy(config: &TelemetryConfig) -> FlushPolicy {
    let mut flush_interval = config.effective_flush_interval();
    let min_interval = Duration::from_secs(MIN_FLUSH_INTERVAL_SECS);
    if flush_interval < min_interval {
        tracing::warn!(
            requested_secs = flush_interval.as_secs(),
            min_secs = MIN_FLUSH_INTERVAL_SECS,
            "flush interval too low, using the minimum"
        );
        flush_interval = min_interval;
    }

    let mut flush_at = config.effective_flush_at();
    if flush_at > MAX_FLUSH_AT {
        tracing::warn!(
            requested = flush_at,
            max = MAX_FLUSH_AT,
            "flush_at too high, using the maximum"
        );
        flush_at = MAX_FLUSH_AT;
    } else if flush_at == 0 {
        tracing::warn!("flush_at must be at least 1, using 1");
        flush_at = 1;
    }

    FlushPolicy {
        flush_at,
        flush_interval,
        tick: config.effective_tick_interval(),
    }
}

/// Buffers events in memory and ships them in batches from a background
/// thread. Telemetry is best effort: delivery failures are logged, never
/// returned from `track`.
pub struct TelemetryClient {
    flusher: Arc<Flusher>,
    policy: FlushPolicy,
    scheduler: Mutex<Option<Scheduler>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for TelemetryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryClient")
            .field("policy", &self.policy)
            .field("queued", &self.queue_len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl TelemetryClient {
    /// Client posting to the configured host. `api_key` is mandatory.
    pub fn from_config(config: &TelemetryConfig) -> TelemetryResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TelemetryError::MissingField {
                field: "api_key".to_string(),
            })?;
        let transport = HttpTransport::new(
            &config.effective_host(),
            api_key,
            config.effective_request_timeout(),
        )?;
        tracing::info!(url = transport.url(), "telemetry client configured");
        Self::with_transport(Arc::new(transport), config)
    }

    /// Client delivering through `transport`. Starts the flush worker.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: &TelemetryConfig,
    ) -> TelemetryResult<Self> {
        let policy = flush_policy(config);
        let flusher = Arc::new(Flusher::new(transport, config.effective_retry_backoff()));
        let scheduler = Scheduler::spawn(Arc::clone(&flusher), policy)?;
        Ok(Self {
            flusher,
            policy,
            scheduler: Mutex::new(Some(scheduler)),
            closed: AtomicBool::new(false),
        })
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Validate and enqueue one event. Never blocks on the network.
    pub fn track(&self, request: TrackRequest) -> TelemetryResult<()> {
        self.ensure_open()?;
        let event = request.into_event(Utc::now())?;
        tracing::debug!(event = %event.event, user_id = %event.user_id, "event queued");
        self.flusher.queue.push([event]);
        Ok(())
    }

    /// Validate and enqueue a `Prompt` event followed by its `Generation`.
    /// Either both are queued or neither is.
    pub fn track_llm(&self, request: LlmRequest) -> TelemetryResult<()> {
        self.ensure_open()?;
        let events = request.into_events(Utc::now())?;
        tracing::debug!(user_id = %events[0].user_id, "llm events queued");
        self.flusher.queue.push(events);
        Ok(())
    }

    /// Flush now on the calling thread. A no-op when the queue is empty or
    /// a flush is already in flight.
    pub fn flush(&self) -> FlushReport {
        self.flusher.flush()
    }

    /// Stop the worker, wait for it and for any flush still in flight on
    /// another thread, then flush whatever is left. Further `track` calls
    /// fail with [`TelemetryError::Closed`].
    pub fn close(&self) -> FlushReport {
        self.closed.store(true, Ordering::Release);
        self.stop_worker();
        let report = self.flusher.drain();
        tracing::info!(
            events = report.events,
            delivered = report.delivered,
            "telemetry client closed"
        );
        report
    }

    pub fn queue_len(&self) -> usize {
        self.flusher.queue.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> TelemetryResult<()> {
        if self.is_closed() {
            Err(TelemetryError::Closed)
        } else {
            Ok(())
        }
    }

    fn stop_worker(&self) {
        let scheduler = lock_or_recover(&self.scheduler).take();
        if let Some(scheduler) = scheduler {
            scheduler.stop();
        }
    }
}

impl Drop for TelemetryClient {
    fn drop(&mut self) {
        self.stop_worker();
        let pending = self.queue_len();
        if pending > 0 {
            tracing::warn!(pending, "telemetry client dropped without close, events lost");
        }
    }
}
