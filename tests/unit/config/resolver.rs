use super::*;

fn table() -> OverrideTable {
    OverrideTable::new([
        (
            "Zoom",
            SnapshotConfiguration::new(1.0)
                .unwrap()
                .with_alternate_variant(),
        ),
        ("Flaky", SnapshotConfiguration::new(0.98).unwrap()),
    ])
    .unwrap()
}

#[test]
fn default_configuration_is_exact_and_default_variant_only() {
    let cfg = SnapshotConfiguration::default();
    assert_eq!(cfg.precision, 1.0);
    assert!(!cfg.runs_under_alternate_variant);
}

#[test]
fn precision_must_be_in_half_open_unit_interval() {
    assert!(SnapshotConfiguration::new(1.0).is_ok());
    assert!(SnapshotConfiguration::new(0.01).is_ok());
    assert!(SnapshotConfiguration::new(0.0).is_err());
    assert!(SnapshotConfiguration::new(1.0001).is_err());
    assert!(SnapshotConfiguration::new(f64::NAN).is_err());
}

#[test]
fn override_wins_over_default() {
    let r = ConfigResolver::new(table());
    assert!(r.resolve("Zoom").runs_under_alternate_variant);
    assert_eq!(r.resolve("Flaky").precision, 0.98);
    assert_eq!(r.resolve("Spin"), SnapshotConfiguration::default());
}

#[test]
fn resolve_is_idempotent() {
    let r = ConfigResolver::new(table());
    for id in ["Zoom", "Flaky", "Spin"] {
        assert_eq!(r.resolve(id), r.resolve(id));
    }
}

#[test]
fn table_rejects_invalid_entries() {
    let bad = SnapshotConfiguration {
        precision: 2.0,
        runs_under_alternate_variant: false,
    };
    let err = OverrideTable::new([("X", bad)]).unwrap_err();
    assert!(err.to_string().contains("override 'X'"));

    let ok = SnapshotConfiguration::default();
    assert!(OverrideTable::new([("A", ok), ("A", ok)]).is_err());
}

#[test]
fn table_deserializes_with_field_defaults() {
    let t: OverrideTable = serde_json::from_str(
        r#"{"Zoom":{"runs_under_alternate_variant":true},"Flaky":{"precision":0.9}}"#,
    )
    .unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("Zoom").unwrap().precision, 1.0);
    assert_eq!(t.get("Flaky").unwrap().precision, 0.9);
    assert!(serde_json::from_str::<OverrideTable>(r#"{"X":{"precision":0}}"#).is_err());
}
