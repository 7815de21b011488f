use fock_ops::{
    build_model, hubbard_chain, random_hopping, stable_hash_string, HubbardChain, ModelPreset,
    ModeLabel, RandomHopping,
};

#[test]
fn hubbard_chain_orders_up_before_down() {
    let model = hubbard_chain(&HubbardChain {
        sites: 3,
        t: 1.0,
        u: 2.0,
        mu: 1.0,
        periodic: false,
    })
    .expect("model");
    let fops = model.fundamental_set().expect("fops");
    assert_eq!(fops.n_operators(), 6);
    assert_eq!(fops.linear_index(&ModeLabel::new("up", 2)).expect("up"), 2);
    assert_eq!(fops.linear_index(&ModeLabel::new("down", 0)).expect("down"), 3);
    assert_eq!(model.quantum_numbers.len(), 2);
    assert_eq!(model.hamiltonian.max_mode(), Some(5));
}

#[test]
fn empty_models_are_rejected() {
    let err = random_hopping(&RandomHopping {
        modes: 0,
        scale: 1.0,
        seed: 1,
    })
    .expect_err("no modes");
    assert_eq!(err.code(), "empty-model");
}

#[test]
fn random_hopping_is_reproducible() {
    let params = RandomHopping {
        modes: 4,
        scale: 0.7,
        seed: 2024,
    };
    let a = random_hopping(&params).expect("model");
    let b = random_hopping(&params).expect("model");
    assert_eq!(
        stable_hash_string(&a).expect("hash"),
        stable_hash_string(&b).expect("hash")
    );
    let other = random_hopping(&RandomHopping { seed: 2025, ..params }).expect("model");
    assert_ne!(a.hamiltonian, other.hamiltonian);
}

#[test]
fn presets_parse_from_tagged_json() {
    let preset: ModelPreset =
        serde_json::from_str(r#"{"kind":"hubbard-chain","sites":2,"u":4.0}"#).expect("parse");
    let model = build_model(&preset).expect("model");
    assert_eq!(model.blocks.len(), 2);
    assert_eq!(model.seed, None);
}
