use fock_core::FockOperator;
use fock_ops::{ImperativeOperator, ManyBodyOperator, SparseState};
use proptest::prelude::*;

const MODES: usize = 5;

fn compiled(op: &ManyBodyOperator) -> ImperativeOperator {
    ImperativeOperator::new(op, MODES).expect("compile")
}

#[test]
fn number_operator_is_diagonal() {
    let n1 = compiled(&ManyBodyOperator::n(1));
    let occupied = SparseState::basis(0b00010);
    let empty = SparseState::basis(0b00001);
    assert!((occupied.dot(&occupied.apply(&n1)) - 1.0).abs() < 1e-12);
    assert_eq!(empty.apply(&n1).norm_sq(), 0.0);
}

#[test]
fn identity_term_acts_as_scalar() {
    let op = compiled(&ManyBodyOperator::constant(2.5));
    assert_eq!(op.image(0b101), vec![(0b101, 2.5)]);
}

#[test]
fn normalization_of_null_vector_fails() {
    assert!(SparseState::zero().normalized().is_none());
    let state = SparseState::from_pairs([(1, 3.0), (2, 4.0)]);
    let unit = state.normalized().expect("non-zero");
    assert!((unit.norm_sq() - 1.0).abs() < 1e-12);
}

proptest! {
    #[test]
    fn canonical_anticommutation(state in 0u64..(1 << MODES), i in 0usize..MODES, j in 0usize..MODES) {
        // {c_i, c†_j} |s> = delta_ij |s>
        let anti = ManyBodyOperator::c(i) * ManyBodyOperator::c_dag(j)
            + ManyBodyOperator::c_dag(j) * ManyBodyOperator::c(i);
        let out = SparseState::basis(state).apply(&compiled(&anti));
        let expected = if i == j { 1.0 } else { 0.0 };
        prop_assert!((out.amplitude(state) - expected).abs() < 1e-12);
        prop_assert!((out.norm_sq() - expected * expected).abs() < 1e-12);
    }

    #[test]
    fn creation_then_annihilation_counts_occupation(state in 0u64..(1 << MODES), i in 0usize..MODES) {
        let n = compiled(&ManyBodyOperator::n(i));
        let basis = SparseState::basis(state);
        let value = basis.dot(&basis.apply(&n));
        let occupied = if state & (1 << i) != 0 { 1.0 } else { 0.0 };
        prop_assert!((value - occupied).abs() < 1e-12);
    }
}
