use fock_ops::{hubbard_chain, HubbardChain, ImperativeOperator, SparseState};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_apply(c: &mut Criterion) {
    let model = hubbard_chain(&HubbardChain {
        sites: 4,
        t: 1.0,
        u: 4.0,
        mu: 2.0,
        periodic: true,
    })
    .expect("model");
    let h = ImperativeOperator::new(&model.hamiltonian, 8).expect("compile");
    c.bench_function("apply_hubbard_full_space", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for state in 0..(1u64 << 8) {
                total += SparseState::basis(state).apply(&h).norm_sq();
            }
            total
        });
    });
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
