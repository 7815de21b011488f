use fock_blocks::{QnPolicy, SortOpts};
use fock_core::{Direction, FockOperator, HilbertSpace};
use fock_ops::{
    hubbard_chain, random_hopping, HubbardChain, ImperativeOperator, ManyBodyOperator, RandomHopping,
};
use proptest::prelude::*;


use fixtures::{sort_anonymous, sort_model};

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

proptest! {
    #[test]
    fn partition_is_complete_and_disjoint(seed in any::<u64>(), modes in 1usize..=6) {
        let model = random_hopping(&RandomHopping { modes, scale: 1.0, seed }).unwrap();
        let sorted = sort_model(&model, SortOpts::default()).unwrap();

        let mut seen: Vec<u64> = sorted
            .partition()
            .subspaces()
            .iter()
            .flat_map(|s| s.fock_states().iter().copied())
            .collect();
        let total: usize = sorted.partition().subspaces().iter().map(|s| s.dimension()).sum();
        prop_assert_eq!(total, 1usize << modes);
        seen.sort_unstable();
        let expected: Vec<u64> = (0..(1u64 << modes)).collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(sorted.n_subspaces(), modes + 1);
    }

    #[test]
    fn local_indices_round_trip(seed in any::<u64>(), modes in 1usize..=5) {
        let model = random_hopping(&RandomHopping { modes, scale: 2.0, seed }).unwrap();
        let sorted = sort_model(&model, SortOpts::default()).unwrap();
        let full = sorted.full_space();

        for state in full.states() {
            prop_assert_eq!(full.state_at(full.index_of(state).unwrap()).unwrap(), state);
            let block = sorted.partition().block_of(state).unwrap();
            let space = sorted.subspace(block).unwrap();
            let local = space.index_of(state).unwrap();
            prop_assert_eq!(space.state_at(local).unwrap(), state);
            prop_assert_eq!(space.index_of(space.state_at(local).unwrap()).unwrap(), local);
        }
    }

    #[test]
    fn connectivity_is_single_valued(sites in 1usize..=3, u in -4.0f64..4.0, mu in -2.0f64..2.0) {
        let model = hubbard_chain(&HubbardChain { sites, t: 1.0, u, mu, periodic: true }).unwrap();
        let sorted = sort_model(&model, SortOpts::default()).unwrap();
        let partition = sorted.partition();
        let n_modes = 2 * sites;

        for mode in 0..n_modes {
            for direction in Direction::ALL {
                let op = ImperativeOperator::canonical(direction.is_creation(), mode, n_modes).unwrap();
                let table = sorted.connectivity().table(mode, direction).unwrap();
                for state in sorted.full_space().states() {
                    let origin = partition.block_of(state).unwrap();
                    for (image, _) in op.image(state) {
                        prop_assert_eq!(table[origin], Some(partition.block_of(image).unwrap()));
                    }
                }
            }
        }
    }

    #[test]
    fn hubbard_blocks_are_spin_resolved(sites in 1usize..=3, u in 0.0f64..6.0) {
        let model = hubbard_chain(&HubbardChain { sites, t: 1.0, u, mu: 0.0, periodic: false }).unwrap();
        let sorted = sort_model(&model, SortOpts::default()).unwrap();

        prop_assert_eq!(sorted.n_subspaces(), (sites + 1) * (sites + 1));
        for block in 0..sorted.n_subspaces() {
            let qn = sorted.quantum_numbers(block).unwrap().values().to_vec();
            let (n_up, n_down) = (qn[0].round() as usize, qn[1].round() as usize);
            prop_assert_eq!(
                sorted.subspace_dimension(block).unwrap(),
                binomial(sites, n_up) * binomial(sites, n_down)
            );
        }
    }

    #[test]
    fn keying_policies_agree_on_integer_charges(seed in any::<u64>(), modes in 1usize..=5) {
        let model = random_hopping(&RandomHopping { modes, scale: 1.0, seed }).unwrap();
        let tolerant = sort_model(&model, SortOpts::default()).unwrap();
        let rounded = sort_model(
            &model,
            SortOpts { qn_policy: QnPolicy::Rounded { digits: 8 }, ..SortOpts::default() },
        )
        .unwrap();

        prop_assert_eq!(tolerant.n_subspaces(), rounded.n_subspaces());
        for block in 0..tolerant.n_subspaces() {
            prop_assert_eq!(
                tolerant.subspace(block).unwrap().fock_states(),
                rounded.subspace(block).unwrap().fock_states()
            );
        }
        prop_assert_eq!(tolerant.connectivity(), rounded.connectivity());
    }
}

#[test]
fn thread_count_does_not_change_the_result() {
    let model = hubbard_chain(&HubbardChain { sites: 3, t: 1.0, u: 2.5, mu: 0.3, periodic: true }).unwrap();
    let serial = sort_model(&model, SortOpts::default()).unwrap();
    let parallel = sort_model(&model, SortOpts { concurrency: 4, ..SortOpts::default() }).unwrap();

    assert_eq!(serial.connectivity(), parallel.connectivity());
    assert_eq!(serial.gs_energy(), parallel.gs_energy());
    assert_eq!(serial.eigensystems(), parallel.eigensystems());
    assert_eq!(serial.hamiltonian_blocks(), parallel.hamiltonian_blocks());
}

#[test]
fn keying_policies_agree_on_fractional_charges() {
    // 0.1 + 0.2 - 0.3 is not exactly zero in floating point
    let charge = ManyBodyOperator::n(0) * 0.1 + ManyBodyOperator::n(1) * 0.2
        - ManyBodyOperator::n(2) * 0.3;
    let triple = ManyBodyOperator::c_dag(0) * ManyBodyOperator::c_dag(1) * ManyBodyOperator::c_dag(2);
    let h = triple.clone() + triple.dagger();
    let qn = vec![charge];

    let tolerant = sort_anonymous(&h, &qn, 3, SortOpts::default()).unwrap();
    let rounded = sort_anonymous(
        &h,
        &qn,
        3,
        SortOpts { qn_policy: QnPolicy::Rounded { digits: 8 }, ..SortOpts::default() },
    )
    .unwrap();

    assert_eq!(tolerant.n_subspaces(), 7);
    assert_eq!(rounded.n_subspaces(), 7);
    for block in 0..tolerant.n_subspaces() {
        assert_eq!(
            tolerant.subspace(block).unwrap().fock_states(),
            rounded.subspace(block).unwrap().fock_states()
        );
    }
    assert_eq!(rounded.subspace(0).unwrap().fock_states(), &[0b000, 0b111]);
    assert_eq!(rounded.quantum_numbers(0).unwrap().values(), &[0.0]);
}
