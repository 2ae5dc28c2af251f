//! Telemetry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Configuration for the telemetry client.
///
/// Every field is optional so that config layers can be merged; the
/// `effective_*` accessors apply the compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Ingestion host; events are posted to `{host}/publish_events`.
    pub host: Option<String>,
    /// API key sent in the `x-api-key` header.
    pub api_key: Option<String>,
    /// Maximum seconds between flushes.
    pub flush_interval_secs: Option<u64>,
    /// Queue length that triggers a flush.
    pub flush_at: Option<usize>,
    /// How often the background worker wakes to check the flush triggers.
    pub tick_interval_ms: Option<u64>,
    /// Pause before the single retry of a failed batch.
    pub retry_backoff_ms: Option<u64>,
    /// HTTP request timeout.
    pub request_timeout_secs: Option<u64>,
}

impl TelemetryConfig {
    pub fn effective_host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| defaults::DEFAULT_TELEMETRY_HOST.to_string())
    }

    pub fn effective_flush_interval(&self) -> Duration {
        Duration::from_secs(
            self.flush_interval_secs
                .unwrap_or(defaults::DEFAULT_FLUSH_INTERVAL_SECS),
        )
    }

    pub fn effective_flush_at(&self) -> usize {
        self.flush_at.unwrap_or(defaults::DEFAULT_FLUSH_AT)
    }

    pub fn effective_tick_interval(&self) -> Duration {
        Duration::from_millis(
            self.tick_interval_ms
                .unwrap_or(defaults::DEFAULT_TICK_INTERVAL_MS),
        )
    }

    pub fn effective_retry_backoff(&self) -> Duration {
        Duration::from_millis(
            self.retry_backoff_ms
                .unwrap_or(defaults::DEFAULT_RETRY_BACKOFF_MS),
        )
    }

    pub fn effective_request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(defaults::DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}
