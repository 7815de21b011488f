use fock_blocks::{diagonalize_block, SortOpts};
use fock_core::FockError;
use fock_ops::{hubbard_chain, random_hopping, HubbardChain, RandomHopping};
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;


use fixtures::{sort_model, TOL};

proptest! {
    #[test]
    fn spectra_are_sorted_orthonormal_and_shifted(seed in any::<u64>(), modes in 1usize..=6) {
        let model = random_hopping(&RandomHopping { modes, scale: 1.0, seed }).unwrap();
        let sorted = sort_model(&model, SortOpts::default()).unwrap();

        let mut lowest = f64::INFINITY;
        for es in sorted.eigensystems() {
            let values: Vec<f64> = es.eigenvalues.iter().copied().collect();
            prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
            let gram = es.eigenvectors.transpose() * &es.eigenvectors;
            let identity = DMatrix::<f64>::identity(es.dimension(), es.dimension());
            prop_assert!((gram - identity).amax() < 1e-9);
            lowest = lowest.min(values[0]);
        }
        prop_assert_eq!(lowest, 0.0);
    }

    #[test]
    fn eigenstates_diagonalize_the_shifted_hamiltonian(sites in 1usize..=3, u in 0.0f64..4.0) {
        let model = hubbard_chain(&HubbardChain { sites, t: 1.0, u, mu: 0.5, periodic: false }).unwrap();
        let sorted = sort_model(&model, SortOpts::default()).unwrap();

        for es in sorted.eigensystems() {
            for (k, state) in es.eigenstates().into_iter().enumerate() {
                let image = sorted.hamiltonian_blocks().apply(&state).unwrap().unwrap();
                prop_assert_eq!(image.block, es.block);
                let residual = &image.amplitudes - &state.amplitudes * es.eigenvalues[k];
                prop_assert!(residual.amax() < 1e-9);
            }
        }
    }
}

#[test]
fn unitary_rows_are_eigenvectors() -> Result<(), FockError> {
    let model = hubbard_chain(&HubbardChain { sites: 2, t: 1.0, u: 3.0, mu: 0.0, periodic: false })?;
    let sorted = sort_model(&model, SortOpts::default())?;

    for es in sorted.eigensystems() {
        let unitary = es.unitary_matrix();
        for k in 0..es.dimension() {
            let state = es.eigenstate(k)?;
            let row: DVector<f64> = unitary.row(k).transpose();
            assert!((row - &state.amplitudes).amax() < TOL);
            assert!((state.norm_sq() - 1.0).abs() < TOL);
        }
        assert!(es.eigenstate(es.dimension()).is_err());
    }
    Ok(())
}

#[test]
fn half_filled_dimer_ground_state_matches_closed_form() -> Result<(), FockError> {
    let u: f64 = 1.0;
    let model = hubbard_chain(&HubbardChain { sites: 2, t: 1.0, u, mu: 0.0, periodic: false })?;
    let sorted = sort_model(&model, SortOpts::default())?;

    // E0 = (U - sqrt(U^2 + 16 t^2)) / 2 in the (1, 1) sector.
    let expected = 0.5 * (u - (u * u + 16.0).sqrt());
    assert!((sorted.gs_energy() - expected).abs() < 1e-9);
    Ok(())
}

#[test]
fn asymmetric_blocks_are_symmetrized() -> Result<(), FockError> {
    let matrix = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 0.0, 0.0]);
    let es = diagonalize_block(7, matrix, &SortOpts::default())?;
    assert_eq!(es.block, 7);
    assert!((es.eigenvalues[0] + 1.0).abs() < TOL);
    assert!((es.eigenvalues[1] - 1.0).abs() < TOL);
    Ok(())
}
