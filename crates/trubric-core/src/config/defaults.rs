// Single source of truth for all default values.

// --- Telemetry ---
pub const DEFAULT_TELEMETRY_HOST: &str = "https://app.trubrics.com/api/ingestion";
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 10;
pub const MIN_FLUSH_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_FLUSH_AT: usize = 20;
pub const MAX_FLUSH_AT: usize = 100;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 5_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// --- Validation ---
pub const DEFAULT_MAX_CATEGORY_CARDINALITY: usize = 20;
pub const DEFAULT_INFERENCE_EXECUTIONS: usize = 100;
pub const DEFAULT_FAILING_SEVERITY: &str = "error";

// --- Data ---
pub const DEFAULT_DATA_CONTEXT_VERSION: &str = "0.1";

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "trubric=info";
pub const LOG_ENV_VAR: &str = "TRUBRIC_LOG";
pub const LOG_FORMAT_ENV_VAR: &str = "TRUBRIC_LOG_FORMAT";
