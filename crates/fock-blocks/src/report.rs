use fock_core::errors::FockError;
use fock_core::{Direction, HilbertSpace, RunProvenance, SchemaVersion};
use fock_ops::stable_hash_string;
use serde::{Deserialize, Serialize};

use crate::opts::SortOpts;
use crate::sorted::SortedSpaces;

/// One line of the decomposition summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Block index.
    pub block: usize,
    /// Canonical quantum numbers.
    pub quantum_numbers: Vec<f64>,
    /// Subspace dimension.
    pub dimension: usize,
    /// Lowest shifted eigenvalue.
    pub lowest_energy: f64,
}

/// Size of the connectivity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivitySummary {
    /// Number of modes.
    pub modes: usize,
    /// Number of recorded `(mode, direction, origin)` edges.
    pub edges: usize,
    /// Stored entries of all block-restricted creation operators.
    pub creation_nnz: usize,
    /// Stored entries of all block-restricted destruction operators.
    pub destruction_nnz: usize,
}

/// Serializable summary of a decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionReport {
    /// Schema of this payload.
    pub schema_version: SchemaVersion,
    /// Content hash over everything except provenance.
    pub report_hash: String,
    /// Canonical hash of the unshifted Hamiltonian.
    pub hamiltonian_hash: String,
    /// Canonical hash of the ordered quantum-number operators.
    pub quantum_numbers_hash: String,
    /// Crate version or commit that produced the report.
    pub commit: String,
    /// Number of modes.
    pub n_modes: usize,
    /// Dimension of the full Fock space.
    pub full_dimension: usize,
    /// Ground-state energy subtracted from every block.
    pub gs_energy: f64,
    /// Per-block summaries in block order.
    pub blocks: Vec<BlockSummary>,
    /// Connectivity graph size.
    pub connectivity: ConnectivitySummary,
    /// Options used for the decomposition.
    pub options: SortOpts,
    /// Run provenance, when attached by a driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<RunProvenance>,
}

/// Shifted eigenvalues of every block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumExport {
    /// Ground-state energy subtracted from every eigenvalue.
    pub gs_energy: f64,
    /// Eigenvalues per block, in block order.
    pub blocks: Vec<BlockSpectrum>,
}

/// Eigenvalues of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpectrum {
    /// Block index.
    pub block: usize,
    /// Ascending shifted eigenvalues.
    pub eigenvalues: Vec<f64>,
}

fn commit_string() -> String {
    option_env!("GIT_COMMIT_HASH")
        .map(|value| value.to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

/// Summarizes `sorted`, including the hashes of the inputs it was built from.
pub fn decomposition_report(sorted: &SortedSpaces) -> Result<DecompositionReport, FockError> {
    let mut blocks = Vec::with_capacity(sorted.n_subspaces());
    for (block, es) in sorted.eigensystems().iter().enumerate() {
        blocks.push(BlockSummary {
            block,
            quantum_numbers: sorted.quantum_numbers(block)?.values().to_vec(),
            dimension: es.dimension(),
            lowest_energy: es.lowest().unwrap_or(0.0),
        });
    }

    let connectivity = sorted.connectivity();
    let nnz = |direction: Direction| -> Result<usize, FockError> {
        let mut total = 0;
        for mode in 0..connectivity.n_modes() {
            total += sorted.single_mode_operator(mode, direction)?.nnz();
        }
        Ok(total)
    };
    let summary = ConnectivitySummary {
        modes: connectivity.n_modes(),
        edges: connectivity.n_edges(),
        creation_nnz: nnz(Direction::Creation)?,
        destruction_nnz: nnz(Direction::Destruction)?,
    };

    let mut report = DecompositionReport {
        schema_version: SchemaVersion::default(),
        report_hash: String::new(),
        hamiltonian_hash: sorted.hamiltonian_hash().to_string(),
        quantum_numbers_hash: sorted.quantum_numbers_hash().to_string(),
        commit: commit_string(),
        n_modes: sorted.full_space().n_modes(),
        full_dimension: sorted.full_space().dimension(),
        gs_energy: sorted.gs_energy(),
        blocks,
        connectivity: summary,
        options: sorted.opts().clone(),
        provenance: None,
    };

    report.report_hash = stable_hash_string(&(
        &report.schema_version,
        &report.hamiltonian_hash,
        &report.quantum_numbers_hash,
        &report.gs_energy,
        &report.blocks,
        &report.connectivity,
        &report.options,
    ))?;

    Ok(report)
}

/// Shifted spectra of every block.
pub fn spectrum_export(sorted: &SortedSpaces) -> SpectrumExport {
    SpectrumExport {
        gs_energy: sorted.gs_energy(),
        blocks: sorted
            .eigensystems()
            .iter()
            .map(|es| BlockSpectrum {
                block: es.block,
                eigenvalues: es.eigenvalues.iter().copied().collect(),
            })
            .collect(),
    }
}
