//! Blocking HTTP transport: `POST {host}/publish_events` with the API key
//! header and a JSON array body.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use trubric_core::constants::{API_KEY_HEADER, PUBLISH_EVENTS_PATH};
use trubric_core::errors::{TelemetryError, TelemetryResult};

use super::Transport;
use crate::events::Event;

fn transport_err(reason: String) -> TelemetryError {
    TelemetryError::Transport { reason }
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(host: &str, api_key: impl Into<String>, timeout: Duration) -> TelemetryResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e: reqwest::Error| transport_err(e.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}{}", host.trim_end_matches('/'), PUBLISH_EVENTS_PATH),
            api_key: api_key.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn publish(&self, events: &[Event]) -> TelemetryResult<()> {
        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(events)
            .send()
            .map_err(|e: reqwest::Error| transport_err(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(event_count = events.len(), "events sent");
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(TelemetryError::HttpStatus {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }
}

/// The `detail` field of a JSON error body, or the body itself.
pub fn error_detail(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_string();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}
