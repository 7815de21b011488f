use fock_core::errors::{ErrorInfo, FockError};
use fock_core::HilbertSpace;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::block_ops::{BlockOperator, BlockState};
use crate::opts::SortOpts;
use crate::partition::Partition;

/// Spectrum of one block: ascending eigenvalues and eigenvectors as columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eigensystem {
    /// Block index of the subspace.
    pub block: usize,
    /// Eigenvalues in non-decreasing order.
    pub eigenvalues: DVector<f64>,
    /// Orthonormal eigenvectors in the local basis; column `k` belongs to eigenvalue `k`.
    pub eigenvectors: DMatrix<f64>,
}

impl Eigensystem {
    /// Dimension of the block.
    pub fn dimension(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Lowest eigenvalue.
    pub fn lowest(&self) -> Option<f64> {
        self.eigenvalues.iter().copied().next()
    }

    /// Unitary matrix whose rows are the eigenvectors.
    pub fn unitary_matrix(&self) -> DMatrix<f64> {
        self.eigenvectors.transpose()
    }

    /// Eigenvector `k` as a state of the block.
    pub fn eigenstate(&self, k: usize) -> Result<BlockState, FockError> {
        if k >= self.dimension() {
            return Err(FockError::index_out_of_range("eigenstate", k as u64, self.dimension()));
        }
        Ok(BlockState {
            block: self.block,
            amplitudes: self.eigenvectors.column(k).into_owned(),
        })
    }

    /// All eigenstates in eigenvalue order.
    pub fn eigenstates(&self) -> Vec<BlockState> {
        self.eigenvectors
            .column_iter()
            .map(|column| BlockState {
                block: self.block,
                amplitudes: column.into_owned(),
            })
            .collect()
    }

    fn shifted(mut self, shift: f64) -> Self {
        self.eigenvalues.add_scalar_mut(-shift);
        self
    }
}

/// Diagonalizes one dense block matrix.
///
/// The matrix is symmetrized before being handed to the solver; an asymmetry
/// above `opts.symmetry_tol` is logged.
pub fn diagonalize_block(
    block: usize,
    matrix: DMatrix<f64>,
    opts: &SortOpts,
) -> Result<Eigensystem, FockError> {
    if !matrix.is_square() {
        return Err(FockError::Diagonalization(
            ErrorInfo::new("non-square-matrix", "block matrix is not square")
                .with_context("block", block)
                .with_context("rows", matrix.nrows())
                .with_context("cols", matrix.ncols()),
        ));
    }
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(FockError::Diagonalization(
            ErrorInfo::new("non-finite-matrix", "block matrix contains NaN or infinite entries")
                .with_context("block", block),
        ));
    }
    let dim = matrix.nrows();
    if dim == 0 {
        return Ok(Eigensystem {
            block,
            eigenvalues: DVector::zeros(0),
            eigenvectors: DMatrix::zeros(0, 0),
        });
    }

    let asymmetry = (&matrix - matrix.transpose()).amax();
    if asymmetry > opts.symmetry_tol {
        warn!(block, asymmetry, "block matrix is not symmetric; symmetrizing");
    }
    let symmetric = (&matrix + matrix.transpose()) * 0.5;

    let eigen = SymmetricEigen::try_new(symmetric, f64::EPSILON, opts.max_eigen_iterations)
        .ok_or_else(|| {
            FockError::Diagonalization(
                ErrorInfo::new("eigen-no-convergence", "symmetric eigensolver did not converge")
                    .with_context("block", block)
                    .with_context("dimension", dim)
                    .with_context("max_iterations", opts.max_eigen_iterations)
                    .with_hint("raise max_eigen_iterations or set it to 0 for no limit"),
            )
        })?;

    let mut order: Vec<usize> = (0..dim).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let eigenvalues = DVector::from_iterator(dim, order.iter().map(|&k| eigen.eigenvalues[k]));
    let eigenvectors = DMatrix::from_fn(dim, dim, |r, c| eigen.eigenvectors[(r, order[c])]);

    debug!(block, dim, lowest = eigenvalues[0], "diagonalized block");
    Ok(Eigensystem {
        block,
        eigenvalues,
        eigenvectors,
    })
}

/// Phase one: independent eigensystems of every diagonal block, in block order.
pub fn diagonalize_blocks(
    partition: &Partition,
    hamiltonian: &BlockOperator,
    opts: &SortOpts,
) -> Result<Vec<Eigensystem>, FockError> {
    let pool = opts.thread_pool()?;
    let results: Vec<Result<Eigensystem, FockError>> = pool.install(|| {
        partition
            .subspaces()
            .par_iter()
            .map(|space| {
                let block = space.index();
                let dim = space.dimension();
                let dense = match hamiltonian.matrix(block) {
                    Some(matrix) => matrix.to_dense(),
                    None => DMatrix::zeros(dim, dim),
                };
                diagonalize_block(block, dense, opts)
            })
            .collect()
    });
    results.into_iter().collect()
}

/// Phase two reduction: the lowest eigenvalue over all blocks.
pub fn ground_state_energy(eigensystems: &[Eigensystem]) -> Result<f64, FockError> {
    eigensystems
        .iter()
        .filter_map(Eigensystem::lowest)
        .min_by(f64::total_cmp)
        .ok_or_else(|| FockError::Diagonalization(ErrorInfo::new("empty-spectrum", "no block has eigenvalues")))
}

/// Phase two map: subtracts `e0` from every eigenvalue.
pub fn shift_spectra(eigensystems: Vec<Eigensystem>, e0: f64) -> Vec<Eigensystem> {
    let shifted: Vec<Eigensystem> = eigensystems.into_iter().map(|es| es.shifted(e0)).collect();
    info!(gs_energy = e0, blocks = shifted.len(), "shifted spectra");
    shifted
}
