use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = HarnessConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, HarnessConfig::default());
    assert_eq!(cfg.max_output_dimension, 500.0);
    assert!(cfg.overrides.is_empty());
    assert!(!cfg.run.parallel);
}

#[test]
fn full_config_parses() {
    let cfg = HarnessConfig::from_json_str(
        r#"{
            "overrides": {
                "Zoom": { "runs_under_alternate_variant": true },
                "Flaky": { "precision": 0.97 }
            },
            "max_output_dimension": 256,
            "min_samples": 50,
            "min_reference_images": 200,
            "run": { "parallel": true, "threads": 4 }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.overrides.len(), 2);
    assert_eq!(cfg.max_output_dimension, 256.0);
    assert_eq!(cfg.min_samples, 50);
    assert_eq!(cfg.run.threads, Some(4));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(HarnessConfig::from_json_str(r#"{"max_output_dimension": 0}"#).is_err());
    assert!(HarnessConfig::from_json_str(r#"{"run": {"threads": 0}}"#).is_err());
    assert!(HarnessConfig::from_json_str(r#"{"overrides": {"A": {"precision": 1.5}}}"#).is_err());
    assert!(HarnessConfig::from_json_str(r#"{"unknown": 1}"#).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let err = HarnessConfig::from_path(Path::new("target/does-not-exist.json")).unwrap_err();
    assert!(err.to_string().contains("open harness config"));
}
