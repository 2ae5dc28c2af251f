//! # trubric-telemetry
//!
//! Best-effort event telemetry. [`TelemetryClient::track`] and
//! [`TelemetryClient::track_llm`] validate and enqueue events without
//! touching the network; a background worker flushes the queue when it
//! reaches `flush_at` events or `flush_interval` has elapsed, and
//! [`TelemetryClient::close`] drains whatever is left.

pub mod client;
pub mod events;
pub mod flush;
pub mod queue;
pub mod scheduler;
pub mod transport;
pub mod validate;

pub use client::TelemetryClient;
pub use events::{Event, LlmRequest, TrackRequest};
pub use flush::FlushReport;
pub use queue::EventQueue;
pub use transport::{HttpTransport, Transport};
