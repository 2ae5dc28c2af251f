use trubric_core::tracing::{init_tracing, spans};

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(check = "validate_performance_against_threshold", "logged after init");
}

#[test]
fn span_macros_use_the_shared_names() {
    init_tracing();
    let check = trubric_core::check_span!("validate_feature_in_top_n_important_features");
    let replay = trubric_core::replay_span!("titanic", 4usize);
    let flush = trubric_core::flush_span!(20usize);
    let _entered = check.enter();

    for (span, name) in [(&check, spans::CHECK), (&replay, spans::REPLAY), (&flush, spans::FLUSH)] {
        if let Some(metadata) = span.metadata() {
            assert_eq!(metadata.name(), name);
        }
    }
}
