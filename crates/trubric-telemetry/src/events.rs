//! Event records and the requests that produce them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One queued event, in wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub user_id: String,
    pub event: String,
    pub properties: Option<Map<String, Value>>,
    /// Serialized as RFC 3339 UTC.
    pub timestamp: DateTime<Utc>,
}

/// Arguments of [`crate::TelemetryClient::track`].
///
/// Every field is optional at the type level so a missing mandatory field
/// is reported as an error instead of being impossible to express.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRequest {
    pub user_id: Option<String>,
    pub event: Option<String>,
    pub properties: Option<Map<String, Value>>,
    /// Defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackRequest {
    pub fn new(user_id: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            event: Some(event.into()),
            ..Self::default()
        }
    }

    pub fn properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Add one property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Arguments of [`crate::TelemetryClient::track_llm`]: one prompt and the
/// generation that answered it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    pub user_id: Option<String>,
    pub prompt: Option<String>,
    pub assistant_id: Option<String>,
    pub generation: Option<String>,
    /// Merged into both events. Caller keys override the reserved `$` keys.
    pub properties: Option<Map<String, Value>>,
    /// Time of the generation. Defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
    /// Milliseconds between prompt and generation. Defaults to 1.
    pub latency_ms: Option<f64>,
}

impl LlmRequest {
    pub fn new(
        user_id: impl Into<String>,
        prompt: impl Into<String>,
        assistant_id: impl Into<String>,
        generation: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            prompt: Some(prompt.into()),
            assistant_id: Some(assistant_id.into()),
            generation: Some(generation.into()),
            ..Self::default()
        }
    }

    pub fn properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }
}
