#![deny(missing_docs)]
#![doc = "Quantum-number block decomposition of fermionic Fock spaces: invariant \
subspaces, their connectivity under single-mode operators and block-local \
spectra shifted to a zero ground-state energy."]

/// Block-restricted sparse operators and block-local states.
pub mod block_ops;
/// Subspace-to-subspace connectivity under creation and destruction operators.
pub mod connectivity;
/// Per-block diagonalization and ground-state shift.
pub mod diag;
/// Full and invariant Hilbert spaces.
pub mod hilbert;
/// Decomposition options.
pub mod opts;
/// Classification of the full space into subspaces.
pub mod partition;
/// Quantum-number vectors and their keyed registry.
pub mod quantum;
/// Serializable summaries of a decomposition.
pub mod report;
/// The decomposition aggregate.
pub mod sorted;

pub use block_ops::{BlockMatrix, BlockOperator, BlockState, MatrixEntry};
pub use connectivity::{build_connectivity, Connectivity, ModeConnections};
pub use diag::{diagonalize_block, diagonalize_blocks, ground_state_energy, shift_spectra, Eigensystem};
pub use hilbert::{FullHilbertSpace, SubHilbertSpace};
pub use opts::{QnPolicy, SortOpts};
pub use partition::{partition, Partition};
pub use quantum::{evaluate, QnRegistry, QuantumNumbers};
pub use report::{
    decomposition_report, spectrum_export, BlockSpectrum, BlockSummary, ConnectivitySummary,
    DecompositionReport, SpectrumExport,
};
pub use sorted::SortedSpaces;
