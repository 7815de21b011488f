use fock_core::errors::{ErrorInfo, FockError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("block", 1)
        .with_context("mode", "up-0")
}

#[test]
fn range_error_surface() {
    let err = FockError::index_out_of_range("state", 9, 8);
    assert_eq!(err.code(), "state-out-of-range");
    assert_eq!(err.info().context.get("state").map(String::as_str), Some("9"));
    assert_eq!(err.info().context.get("dimension").map(String::as_str), Some("8"));
}

#[test]
fn block_error_surface() {
    let err = FockError::Block(sample_info("inconsistent-connection", "two targets"));
    assert_eq!(err.info().code, "inconsistent-connection");
    assert!(err.info().context.contains_key("mode"));
}

#[test]
fn diagonalization_error_surface() {
    let err = FockError::Diagonalization(sample_info("eigen-no-convergence", "stalled"));
    assert_eq!(err.code(), "eigen-no-convergence");
}

#[test]
fn display_includes_context_and_hint() {
    let err = FockError::Config(
        ErrorInfo::new("bad-option", "concurrency must be positive")
            .with_context("concurrency", 0)
            .with_hint("use at least one worker"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("config error: concurrency must be positive"));
    assert!(rendered.contains("concurrency=0"));
    assert!(rendered.contains("hint: use at least one worker"));
}

#[test]
fn errors_round_trip_json() {
    let err = FockError::Operator(sample_info("unknown-mode", "no such label"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Operator\""));
    let decoded: FockError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
