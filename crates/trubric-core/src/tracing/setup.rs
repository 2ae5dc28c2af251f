//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::defaults::{DEFAULT_LOG_FILTER, LOG_ENV_VAR, LOG_FORMAT_ENV_VAR};

static INIT: Once = Once::new();

/// Initialize the trubric tracing/logging system.
///
/// Reads the `TRUBRIC_LOG` environment variable for per-subsystem log levels.
/// Format: `TRUBRIC_LOG=trubric_validation=debug,trubric_telemetry=warn`
///
/// Falls back to `trubric=info` if `TRUBRIC_LOG` is not set or is invalid.
/// `TRUBRIC_LOG_FORMAT=json` switches to structured JSON lines.
///
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // A host application may already own the global subscriber.
        let _ = if json_requested() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .with(filter)
                .try_init()
        };
    });
}

fn json_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV_VAR)
        .map(|format| format.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
