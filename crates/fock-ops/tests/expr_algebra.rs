use fock_ops::{hopping, particle_number, CanonicalOp, ManyBodyOperator, Term};

#[test]
fn identical_products_are_merged() {
    let op = ManyBodyOperator::n(0) + ManyBodyOperator::n(0) * 2.0;
    assert_eq!(op.terms().len(), 1);
    assert!((op.terms()[0].coef - 3.0).abs() < 1e-12);
}

#[test]
fn cancelling_terms_vanish() {
    let op = ManyBodyOperator::n(1) - ManyBodyOperator::n(1);
    assert!(op.is_zero());
}

#[test]
fn number_operator_is_dagger_then_annihilate() {
    let n = ManyBodyOperator::n(2);
    assert_eq!(
        n.terms(),
        &[Term {
            coef: 1.0,
            ops: vec![
                CanonicalOp { dagger: true, mode: 2 },
                CanonicalOp { dagger: false, mode: 2 },
            ],
        }]
    );
}

#[test]
fn hopping_is_self_adjoint() {
    let h = hopping(0.5, 0, 3);
    let mut lhs = h.terms().to_vec();
    let mut rhs = h.dagger().terms().to_vec();
    lhs.sort_by(|a, b| a.ops.cmp(&b.ops));
    rhs.sort_by(|a, b| a.ops.cmp(&b.ops));
    assert_eq!(lhs, rhs);
    assert_eq!(h.max_mode(), Some(3));
}

#[test]
fn shift_adds_identity_term() {
    let h = particle_number(0..2).shifted(1.5);
    let identity = h
        .terms()
        .iter()
        .find(|term| term.ops.is_empty())
        .expect("identity term");
    assert!((identity.coef + 1.5).abs() < 1e-12);
}

#[test]
fn expressions_serialize_as_term_lists() {
    let op = ManyBodyOperator::c_dag(1) * 2.0;
    let json = serde_json::to_string(&op).expect("serialize");
    assert_eq!(json, r#"[{"coef":2.0,"ops":[{"dagger":true,"mode":1}]}]"#);
    let decoded: ManyBodyOperator = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, op);
}
