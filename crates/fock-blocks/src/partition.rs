use fock_core::errors::{ErrorInfo, FockError};
use fock_core::{FockState, HilbertSpace};
use fock_ops::{ImperativeOperator, SparseState};
use tracing::{debug, info};

use crate::hilbert::{FullHilbertSpace, SubHilbertSpace};
use crate::opts::QnPolicy;
use crate::quantum::{evaluate, QnRegistry, QuantumNumbers};

/// Registry of invariant subspaces covering the full space exactly once.
///
/// Subspaces live in a single arena and are referenced everywhere else by
/// their block index.
#[derive(Debug, Clone)]
pub struct Partition {
    full: FullHilbertSpace,
    spaces: Vec<SubHilbertSpace>,
    quantum_numbers: Vec<QuantumNumbers>,
    block_of: Vec<usize>,
    registry: QnRegistry,
}

/// Splits `full` into subspaces of equal quantum numbers.
///
/// States are visited in ascending order, so block indices and local indices
/// are reproducible for a given operator list and mode ordering.
pub fn partition(
    full: &FullHilbertSpace,
    qn_ops: &[ImperativeOperator],
    policy: QnPolicy,
) -> Result<Partition, FockError> {
    let mut registry = QnRegistry::new(policy);
    let mut spaces: Vec<SubHilbertSpace> = Vec::new();
    let mut quantum_numbers = Vec::new();
    let mut block_of = Vec::with_capacity(full.dimension());

    for r in 0..full.dimension() {
        let fs = full.state_at(r)?;
        let qn = evaluate(&SparseState::basis(fs), qn_ops);
        let (block, fresh) = registry.lookup_or_insert(&qn, spaces.len());
        if fresh {
            debug!(block, qn = ?qn.values(), "new subspace");
            spaces.push(SubHilbertSpace::new(block));
            quantum_numbers.push(qn);
        }
        spaces[block].add_fock_state(fs);
        block_of.push(block);
    }

    info!(
        blocks = spaces.len(),
        dimension = full.dimension(),
        "partitioned Fock space"
    );

    Ok(Partition {
        full: *full,
        spaces,
        quantum_numbers,
        block_of,
        registry,
    })
}

impl Partition {
    /// The partitioned full space.
    pub fn full_space(&self) -> &FullHilbertSpace {
        &self.full
    }

    /// Number of subspaces.
    pub fn n_subspaces(&self) -> usize {
        self.spaces.len()
    }

    /// All subspaces in block order.
    pub fn subspaces(&self) -> &[SubHilbertSpace] {
        &self.spaces
    }

    /// Subspace with block index `block`.
    pub fn subspace(&self, block: usize) -> Result<&SubHilbertSpace, FockError> {
        self.spaces.get(block).ok_or_else(|| unknown_block(block, self.spaces.len()))
    }

    /// Canonical quantum numbers of `block`.
    pub fn quantum_numbers(&self, block: usize) -> Result<&QuantumNumbers, FockError> {
        self.quantum_numbers
            .get(block)
            .ok_or_else(|| unknown_block(block, self.spaces.len()))
    }

    /// Block containing `state`.
    pub fn block_of(&self, state: FockState) -> Result<usize, FockError> {
        let index = self.full.index_of(state)?;
        Ok(self.block_of[index])
    }

    /// Block registered for `qn` under the partition's keying policy.
    pub fn resolve(&self, qn: &QuantumNumbers) -> Option<usize> {
        self.registry.lookup(qn)
    }

    /// Keying policy used to build the partition.
    pub fn policy(&self) -> QnPolicy {
        self.registry.policy()
    }
}

fn unknown_block(block: usize, count: usize) -> FockError {
    FockError::Range(
        ErrorInfo::new("block-out-of-range", "no subspace with this block index")
            .with_context("block", block)
            .with_context("blocks", count),
    )
}
