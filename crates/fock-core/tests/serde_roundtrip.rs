use fock_core::provenance::{RunProvenance, SchemaVersion};
use fock_core::Direction;

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance {
        input_hash: "input".into(),
        hamiltonian_hash: "hamiltonian".into(),
        quantum_numbers_hash: "qn".into(),
        seed: Some(99),
        created_at: "2023-10-31T00:00:00Z".into(),
        tool_versions: [("fock-core".into(), "0.1.0".into())].into_iter().collect(),
    };

    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, provenance);
}

#[test]
fn schema_version_defaults_to_one() {
    assert_eq!(SchemaVersion::default(), SchemaVersion::new(1, 0, 0));
}

#[test]
fn direction_uses_kebab_case() {
    let json = serde_json::to_string(&Direction::Destruction).expect("serialize");
    assert_eq!(json, "\"destruction\"");
    assert!(Direction::Creation.is_creation());
    assert_eq!(Direction::ALL.len(), 2);
}

#[test]
fn full_dimension_guards_mode_count() {
    assert_eq!(fock_core::full_dimension(0).expect("dim"), 1);
    assert_eq!(fock_core::full_dimension(3).expect("dim"), 8);
    let err = fock_core::full_dimension(fock_core::MAX_MODES + 1).expect_err("too many");
    assert_eq!(err.code(), "too-many-modes");
}
