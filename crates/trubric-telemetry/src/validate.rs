//! Request validation. Runs on the caller's thread before anything is
//! queued, so a rejected request leaves the queue untouched.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use trubric_core::constants::{
    ASSISTANT_ID_PROPERTY, DEFAULT_LLM_LATENCY_MS, GENERATION_EVENT, LATENCY_PROPERTY,
    PROMPT_EVENT, PROMPT_PROPERTY, TEXT_PROPERTY,
};
use trubric_core::errors::{TelemetryError, TelemetryResult};

use crate::events::{Event, LlmRequest, TrackRequest};

/// A mandatory string: present and not blank.
fn required(field: &str, value: Option<String>) -> TelemetryResult<String> {
    let value = value.ok_or_else(|| TelemetryError::MissingField {
        field: field.to_string(),
    })?;
    if value.trim().is_empty() {
        return Err(TelemetryError::InvalidField {
            field: field.to_string(),
            reason: "must be a non-empty string".to_string(),
        });
    }
    Ok(value)
}

fn latency(value: Option<f64>) -> TelemetryResult<Duration> {
    let ms = value.unwrap_or(DEFAULT_LLM_LATENCY_MS);
    if !ms.is_finite() || ms < 0.0 {
        return Err(TelemetryError::InvalidField {
            field: "latency_ms".to_string(),
            reason: format!("must be a non-negative number, got {ms}"),
        });
    }
    Ok(Duration::microseconds((ms * 1_000.0).round() as i64))
}

/// `reserved` first, then the caller's properties on top.
fn merged(reserved: Map<String, Value>, properties: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut merged = reserved;
    if let Some(properties) = properties {
        merged.extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

impl TrackRequest {
    /// Validate into a queueable event stamped `now` unless a timestamp
    /// was given.
    pub fn into_event(self, now: DateTime<Utc>) -> TelemetryResult<Event> {
        Ok(Event {
            user_id: required("user_id", self.user_id)?,
            event: required("event", self.event)?,
            properties: self.properties,
            timestamp: self.timestamp.unwrap_or(now),
        })
    }
}

impl LlmRequest {
    /// Validate into the ordered `Prompt`, `Generation` pair. The prompt is
    /// back-dated from the generation timestamp by the latency.
    pub fn into_events(self, now: DateTime<Utc>) -> TelemetryResult<[Event; 2]> {
        let user_id = required("user_id", self.user_id)?;
        let prompt = required("prompt", self.prompt)?;
        let assistant_id = required("assistant_id", self.assistant_id)?;
        let generation = required("generation", self.generation)?;
        let latency_ms = self.latency_ms.unwrap_or(DEFAULT_LLM_LATENCY_MS);
        let generation_timestamp = self.timestamp.unwrap_or(now);
        let prompt_timestamp = generation_timestamp - latency(self.latency_ms)?;

        let mut prompt_properties = Map::new();
        prompt_properties.insert(TEXT_PROPERTY.to_string(), Value::from(prompt.clone()));

        let mut generation_properties = Map::new();
        generation_properties.insert(TEXT_PROPERTY.to_string(), Value::from(generation));
        generation_properties.insert(ASSISTANT_ID_PROPERTY.to_string(), Value::from(assistant_id));
        generation_properties.insert(PROMPT_PROPERTY.to_string(), Value::from(prompt));
        generation_properties.insert(LATENCY_PROPERTY.to_string(), Value::from(latency_ms));

        Ok([
            Event {
                user_id: user_id.clone(),
                event: PROMPT_EVENT.to_string(),
                properties: Some(merged(prompt_properties, self.properties.as_ref())),
                timestamp: prompt_timestamp,
            },
            Event {
                user_id,
                event: GENERATION_EVENT.to_string(),
                properties: Some(merged(generation_properties, self.properties.as_ref())),
                timestamp: generation_timestamp,
            },
        ])
    }
}
