use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SnapshotError::unsupported_environment("x")
            .to_string()
            .contains("unsupported environment:")
    );
    assert!(
        SnapshotError::corpus_unavailable("x")
            .to_string()
            .contains("corpus unavailable:")
    );
    assert!(
        SnapshotError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SnapshotError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SnapshotError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_environment_and_corpus_errors_are_fatal() {
    assert!(SnapshotError::unsupported_environment("scale").is_fatal_run_error());
    assert!(SnapshotError::corpus_unavailable("io").is_fatal_run_error());
    assert!(!SnapshotError::validation("x").is_fatal_run_error());
    assert!(!SnapshotError::serde("x").is_fatal_run_error());
}
