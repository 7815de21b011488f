use fock_core::errors::{ErrorInfo, FockError};
use fock_core::{FockOperator, HilbertSpace};
use fock_ops::SparseState;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::hilbert::SubHilbertSpace;
use crate::partition::Partition;

/// Amplitudes below this magnitude are treated as exact cancellations.
const WEIGHT_CUTOFF: f64 = 1e-14;

/// Vector living in one subspace, expressed in its local basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockState {
    /// Block index of the subspace.
    pub block: usize,
    /// Amplitudes in local-index order.
    pub amplitudes: DVector<f64>,
}

impl BlockState {
    /// Local basis vector `local` of `block` with dimension `dim`.
    pub fn basis(block: usize, dim: usize, local: usize) -> Result<Self, FockError> {
        if local >= dim {
            return Err(FockError::index_out_of_range("index", local as u64, dim));
        }
        let mut amplitudes = DVector::zeros(dim);
        amplitudes[local] = 1.0;
        Ok(Self { block, amplitudes })
    }

    /// Squared Euclidean norm.
    pub fn norm_sq(&self) -> f64 {
        self.amplitudes.norm_squared()
    }
}

/// Single non-zero coefficient of a [`BlockMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    /// Local index in the target block.
    pub row: usize,
    /// Local index in the origin block.
    pub col: usize,
    /// Matrix element.
    pub weight: f64,
}

/// Sparse matrix of an operator restricted to `origin → target`.
///
/// Entries are sorted by `(row, col)` and coalesced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMatrix {
    /// Origin block.
    pub origin: usize,
    /// Target block.
    pub target: usize,
    /// Dimension of the target block.
    pub rows: usize,
    /// Dimension of the origin block.
    pub cols: usize,
    entries: Vec<MatrixEntry>,
}

impl BlockMatrix {
    /// Restricts `op` to `origin → target`, column by column.
    ///
    /// Any image weight falling outside `target` is reported as a
    /// [`FockError::Block`] with `leak_code`.
    pub fn restrict(
        op: &dyn FockOperator,
        origin: &SubHilbertSpace,
        target: &SubHilbertSpace,
        leak_code: &str,
    ) -> Result<Self, FockError> {
        let mut entries = Vec::new();
        for (col, &state) in origin.fock_states().iter().enumerate() {
            let image = SparseState::basis(state).apply(op);
            for (image_state, weight) in image.iter() {
                if weight.abs() <= WEIGHT_CUTOFF {
                    continue;
                }
                if !target.contains(image_state) {
                    return Err(FockError::Block(
                        ErrorInfo::new(leak_code, "operator image leaves the expected subspace")
                            .with_context("origin_block", origin.index())
                            .with_context("target_block", target.index())
                            .with_context("state", state)
                            .with_context("image_state", image_state)
                            .with_context("weight", weight),
                    ));
                }
                let row = target.index_of(image_state)?;
                entries.push(MatrixEntry { row, col, weight });
            }
        }
        Ok(Self::from_entries(
            origin.index(),
            target.index(),
            target.dimension(),
            origin.dimension(),
            entries,
        ))
    }

    /// Builds a matrix from raw entries, sorting and summing duplicates.
    pub fn from_entries(
        origin: usize,
        target: usize,
        rows: usize,
        cols: usize,
        mut entries: Vec<MatrixEntry>,
    ) -> Self {
        entries.sort_by(|a, b| a.row.cmp(&b.row).then_with(|| a.col.cmp(&b.col)));
        let mut coalesced: Vec<MatrixEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(prev) = coalesced.last_mut() {
                if prev.row == entry.row && prev.col == entry.col {
                    prev.weight += entry.weight;
                    continue;
                }
            }
            coalesced.push(entry);
        }
        coalesced.retain(|entry| entry.weight.abs() > WEIGHT_CUTOFF);
        Self {
            origin,
            target,
            rows,
            cols,
            entries: coalesced,
        }
    }

    /// Stored entries in `(row, col)` order.
    pub fn entries(&self) -> &[MatrixEntry] {
        &self.entries
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dense `rows × cols` copy.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.rows, self.cols);
        for entry in &self.entries {
            dense[(entry.row, entry.col)] += entry.weight;
        }
        dense
    }

    /// Matrix-vector product in local bases.
    pub fn mul_vector(&self, amplitudes: &DVector<f64>) -> DVector<f64> {
        let mut out = DVector::zeros(self.rows);
        for entry in &self.entries {
            out[entry.row] += entry.weight * amplitudes[entry.col];
        }
        out
    }

    /// Transpose, mapping `target → origin`.
    pub fn transpose(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|e| MatrixEntry {
                row: e.col,
                col: e.row,
                weight: e.weight,
            })
            .collect();
        Self::from_entries(self.target, self.origin, self.cols, self.rows, entries)
    }
}

/// Operator stored as one optional [`BlockMatrix`] per origin block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockOperator {
    blocks: Vec<Option<BlockMatrix>>,
}

impl BlockOperator {
    /// Builds the block-restricted form of `op` from a connectivity table.
    pub fn from_connection(
        partition: &Partition,
        op: &dyn FockOperator,
        table: &[Option<usize>],
    ) -> Result<Self, FockError> {
        let blocks = table
            .iter()
            .enumerate()
            .map(|(origin, target)| -> Result<Option<BlockMatrix>, FockError> {
                let Some(target) = target else {
                    return Ok(None);
                };
                let matrix = BlockMatrix::restrict(
                    op,
                    partition.subspace(origin)?,
                    partition.subspace(*target)?,
                    "image-outside-target",
                )?;
                Ok(Some(matrix))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blocks })
    }

    /// Builds the block-diagonal form of `op`, which must leave every block invariant.
    ///
    /// Blocks are restricted in parallel on the current rayon pool.
    pub fn block_diagonal(partition: &Partition, op: &dyn FockOperator) -> Result<Self, FockError> {
        let results: Vec<Result<BlockMatrix, FockError>> = partition
            .subspaces()
            .par_iter()
            .map(|space| BlockMatrix::restrict(op, space, space, "hamiltonian-leaks-block"))
            .collect();
        let blocks = results
            .into_iter()
            .map(|result| result.map(Some))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blocks })
    }

    /// Number of origin blocks.
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Matrix acting on `origin`, if the operator does not annihilate it.
    pub fn matrix(&self, origin: usize) -> Option<&BlockMatrix> {
        self.blocks.get(origin).and_then(Option::as_ref)
    }

    /// Block reached from `origin`, if any.
    pub fn target(&self, origin: usize) -> Option<usize> {
        self.matrix(origin).map(|m| m.target)
    }

    /// Applies the operator; `None` when the origin block is annihilated.
    pub fn apply(&self, state: &BlockState) -> Result<Option<BlockState>, FockError> {
        let slot = self.blocks.get(state.block).ok_or_else(|| {
            FockError::index_out_of_range("block", state.block as u64, self.blocks.len())
        })?;
        let Some(matrix) = slot else {
            return Ok(None);
        };
        if state.amplitudes.len() != matrix.cols {
            return Err(FockError::Range(
                ErrorInfo::new("dimension-mismatch", "state dimension differs from its block")
                    .with_context("block", state.block)
                    .with_context("expected", matrix.cols)
                    .with_context("found", state.amplitudes.len()),
            ));
        }
        Ok(Some(BlockState {
            block: matrix.target,
            amplitudes: matrix.mul_vector(&state.amplitudes),
        }))
    }

    /// Total number of stored entries across blocks.
    pub fn nnz(&self) -> usize {
        self.blocks.iter().flatten().map(BlockMatrix::nnz).sum()
    }
}
