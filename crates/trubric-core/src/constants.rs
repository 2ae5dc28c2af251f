/// Trubric JSON files are written with this extension.
pub const TRUBRIC_FILE_EXTENSION: &str = "json";

/// Key under which a check's severity travels in its keyword arguments.
pub const SEVERITY_KWARG: &str = "severity";

/// Result key used by the minimum functionality checks for failing rows.
pub const ERRORS_DF_KEY: &str = "errors_df";

/// Suffix appended to the target column when predictions are attached to rows.
pub const PREDICTIONS_SUFFIX: &str = "_predictions";

/// Path appended to the telemetry host when publishing events.
pub const PUBLISH_EVENTS_PATH: &str = "/publish_events";

/// Header carrying the telemetry API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Event name of the first half of an LLM interaction.
pub const PROMPT_EVENT: &str = "Prompt";

/// Event name of the second half of an LLM interaction.
pub const GENERATION_EVENT: &str = "Generation";

/// Reserved property keys of the LLM event pair.
pub const TEXT_PROPERTY: &str = "$text";
pub const ASSISTANT_ID_PROPERTY: &str = "$assistant_id";
pub const PROMPT_PROPERTY: &str = "$prompt";
pub const LATENCY_PROPERTY: &str = "latency(ms)";

/// Latency assumed between a prompt and its generation when none is given.
pub const DEFAULT_LLM_LATENCY_MS: f64 = 1.0;
