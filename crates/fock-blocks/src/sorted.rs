use std::collections::BTreeMap;
use std::fmt;

use fock_core::errors::{ErrorInfo, FockError};
use fock_core::{Direction, HilbertSpace};
use fock_ops::{
    stable_hash_string, BlockDesc, FundamentalOperatorSet, ImperativeOperator, ManyBodyOperator,
};
use rayon::prelude::*;
use tracing::info;

use crate::block_ops::BlockOperator;
use crate::connectivity::{build_connectivity, Connectivity};
use crate::diag::{diagonalize_blocks, ground_state_energy, shift_spectra, Eigensystem};
use crate::hilbert::{FullHilbertSpace, SubHilbertSpace};
use crate::opts::SortOpts;
use crate::partition::{partition, Partition};
use crate::quantum::QuantumNumbers;

/// Fock space sorted into invariant blocks, with connectivity and shifted spectra.
///
/// Built once by [`SortedSpaces::new`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SortedSpaces {
    fops: FundamentalOperatorSet,
    mode_lookup: BTreeMap<(usize, usize), usize>,
    opts: SortOpts,
    partition: Partition,
    connectivity: Connectivity,
    creation_ops: Vec<BlockOperator>,
    destruction_ops: Vec<BlockOperator>,
    eigensystems: Vec<Eigensystem>,
    gs_energy: f64,
    hamiltonian: ManyBodyOperator,
    hamiltonian_blocks: BlockOperator,
    hamiltonian_hash: String,
    quantum_numbers_hash: String,
}

impl SortedSpaces {
    /// Runs the full decomposition of `h` under the conserved quantities `qn`.
    ///
    /// `block_structure` only feeds [`SortedSpaces::mode_index`]; an empty slice
    /// leaves that lookup empty.
    pub fn new(
        h: &ManyBodyOperator,
        qn: &[ManyBodyOperator],
        fops: FundamentalOperatorSet,
        block_structure: &[BlockDesc],
        opts: SortOpts,
    ) -> Result<Self, FockError> {
        opts.validate()?;
        let n_modes = fops.n_operators();
        let mode_lookup = fops.block_lookup(block_structure)?;
        let full = FullHilbertSpace::new(n_modes)?;
        let qn_ops = qn
            .iter()
            .map(|op| ImperativeOperator::new(op, n_modes))
            .collect::<Result<Vec<_>, _>>()?;
        let h_op = ImperativeOperator::new(h, n_modes)?;
        let hamiltonian_hash = stable_hash_string(h)?;
        let quantum_numbers_hash = stable_hash_string(&qn)?;

        let partition = partition(&full, &qn_ops, opts.qn_policy)?;
        let connectivity = build_connectivity(&partition, &qn_ops, &opts)?;

        let pool = opts.thread_pool()?;
        let (creation_ops, destruction_ops) = pool.install(|| {
            let creation = single_mode_operators(&partition, &connectivity, Direction::Creation)?;
            let destruction =
                single_mode_operators(&partition, &connectivity, Direction::Destruction)?;
            Ok::<_, FockError>((creation, destruction))
        })?;
        let unshifted = pool.install(|| BlockOperator::block_diagonal(&partition, &h_op))?;

        let eigensystems = diagonalize_blocks(&partition, &unshifted, &opts)?;
        let gs_energy = ground_state_energy(&eigensystems)?;
        let eigensystems = shift_spectra(eigensystems, gs_energy);

        let hamiltonian = h.shifted(gs_energy);
        let shifted_op = ImperativeOperator::new(&hamiltonian, n_modes)?;
        let hamiltonian_blocks =
            pool.install(|| BlockOperator::block_diagonal(&partition, &shifted_op))?;

        info!(
            modes = n_modes,
            blocks = partition.n_subspaces(),
            gs_energy,
            "sorted Fock space"
        );

        Ok(Self {
            fops,
            mode_lookup,
            opts,
            partition,
            connectivity,
            creation_ops,
            destruction_ops,
            eigensystems,
            gs_energy,
            hamiltonian,
            hamiltonian_blocks,
            hamiltonian_hash,
            quantum_numbers_hash,
        })
    }

    /// Mode set the decomposition was built on.
    pub fn fundamental_operators(&self) -> &FundamentalOperatorSet {
        &self.fops
    }

    /// Options the decomposition was built with.
    pub fn opts(&self) -> &SortOpts {
        &self.opts
    }

    /// Underlying partition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The full Fock space.
    pub fn full_space(&self) -> &FullHilbertSpace {
        self.partition.full_space()
    }

    /// Number of invariant subspaces.
    pub fn n_subspaces(&self) -> usize {
        self.partition.n_subspaces()
    }

    /// Subspace `block`.
    pub fn subspace(&self, block: usize) -> Result<&SubHilbertSpace, FockError> {
        self.partition.subspace(block)
    }

    /// Dimension of subspace `block`.
    pub fn subspace_dimension(&self, block: usize) -> Result<usize, FockError> {
        Ok(self.partition.subspace(block)?.dimension())
    }

    /// Quantum numbers of subspace `block`.
    pub fn quantum_numbers(&self, block: usize) -> Result<&QuantumNumbers, FockError> {
        self.partition.quantum_numbers(block)
    }

    /// Shifted eigensystems in block order.
    pub fn eigensystems(&self) -> &[Eigensystem] {
        &self.eigensystems
    }

    /// Shifted eigensystem of `block`.
    pub fn eigensystem(&self, block: usize) -> Result<&Eigensystem, FockError> {
        self.eigensystems
            .get(block)
            .ok_or_else(|| FockError::index_out_of_range("block", block as u64, self.eigensystems.len()))
    }

    /// Ground-state energy subtracted from every spectrum.
    pub fn gs_energy(&self) -> f64 {
        self.gs_energy
    }

    /// Connectivity graph.
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Target block of `mode` in `direction` starting from `origin`.
    pub fn target(
        &self,
        mode: usize,
        direction: Direction,
        origin: usize,
    ) -> Result<Option<usize>, FockError> {
        self.connectivity.target(mode, direction, origin)
    }

    /// Block-restricted `c†` (creation) or `c` (destruction) of `mode`.
    pub fn single_mode_operator(
        &self,
        mode: usize,
        direction: Direction,
    ) -> Result<&BlockOperator, FockError> {
        let ops = match direction {
            Direction::Creation => &self.creation_ops,
            Direction::Destruction => &self.destruction_ops,
        };
        ops.get(mode)
            .ok_or_else(|| FockError::index_out_of_range("mode", mode as u64, ops.len()))
    }

    /// Hamiltonian expression shifted by the ground-state energy.
    pub fn hamiltonian(&self) -> &ManyBodyOperator {
        &self.hamiltonian
    }

    /// Block-diagonal form of the shifted Hamiltonian.
    pub fn hamiltonian_blocks(&self) -> &BlockOperator {
        &self.hamiltonian_blocks
    }

    /// Canonical hash of the unshifted Hamiltonian that was decomposed.
    pub fn hamiltonian_hash(&self) -> &str {
        &self.hamiltonian_hash
    }

    /// Canonical hash of the ordered quantum-number operators.
    pub fn quantum_numbers_hash(&self) -> &str {
        &self.quantum_numbers_hash
    }

    /// Linear mode index of position `offset` within block `block`.
    pub fn mode_index(&self, block: usize, offset: usize) -> Result<usize, FockError> {
        self.mode_lookup.get(&(block, offset)).copied().ok_or_else(|| {
            FockError::Operator(
                ErrorInfo::new("unknown-block-offset", "no mode at this block position")
                    .with_context("block", block)
                    .with_context("offset", offset),
            )
        })
    }
}

fn single_mode_operators(
    partition: &Partition,
    connectivity: &Connectivity,
    direction: Direction,
) -> Result<Vec<BlockOperator>, FockError> {
    let n_modes = connectivity.n_modes();
    let results: Vec<Result<BlockOperator, FockError>> = (0..n_modes)
        .into_par_iter()
        .map(|mode| {
            let op = ImperativeOperator::canonical(direction.is_creation(), mode, n_modes)?;
            BlockOperator::from_connection(partition, &op, connectivity.table(mode, direction)?)
        })
        .collect();
    results.into_iter().collect()
}

impl fmt::Display for SortedSpaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of blocks: {}", self.n_subspaces())?;
        for (block, (space, es)) in self
            .partition
            .subspaces()
            .iter()
            .zip(&self.eigensystems)
            .enumerate()
        {
            write!(f, "Block {block}, qn = ")?;
            if let Ok(qn) = self.partition.quantum_numbers(block) {
                for x in qn.values() {
                    write!(f, "{x} ")?;
                }
            }
            write!(f, ", size = {}", space.dimension())?;
            match es.lowest() {
                Some(e) => writeln!(f, " Relative gs energy : {e}")?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}
