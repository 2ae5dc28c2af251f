//! Span names for the two subsystems.
//!
//! Using consistent names enables structured log queries across the
//! validation engine and the telemetry client.

/// One check invocation through the normalizer.
pub const CHECK: &str = "trubric.check";

/// Replay of a persisted trubric.
pub const REPLAY: &str = "trubric.replay";

/// One telemetry flush cycle.
pub const FLUSH: &str = "trubric.flush";

/// Create a check span.
#[macro_export]
macro_rules! check_span {
    ($check:expr) => {
        ::tracing::info_span!("trubric.check", check = %$check)
    };
}

/// Create a replay span.
#[macro_export]
macro_rules! replay_span {
    ($trubric:expr, $validations:expr) => {
        ::tracing::info_span!("trubric.replay", trubric = %$trubric, validations = $validations)
    };
}

/// Create a flush span.
#[macro_export]
macro_rules! flush_span {
    ($event_count:expr) => {
        ::tracing::debug_span!("trubric.flush", event_count = $event_count)
    };
}
