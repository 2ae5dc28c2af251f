//! Transport layer: where flushed batches go.

pub mod http_client;

pub use http_client::{error_detail, HttpTransport};

use trubric_core::errors::TelemetryResult;

use crate::events::Event;

/// Delivers one batch. Any error counts as a failed attempt; the flush
/// path decides whether to retry.
pub trait Transport: Send + Sync {
    fn publish(&self, events: &[Event]) -> TelemetryResult<()>;
}
