use fock_core::errors::{ErrorInfo, FockError};
use fock_core::{Direction, FockState};
use fock_ops::{ImperativeOperator, SparseState};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::opts::SortOpts;
use crate::partition::Partition;
use crate::quantum::evaluate;

/// Subspace-to-subspace maps of `c†` and `c` for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConnections {
    /// Linear index of the mode.
    pub mode: usize,
    /// Target block of `c†`, indexed by origin block.
    pub creation: Vec<Option<usize>>,
    /// Target block of `c`, indexed by origin block.
    pub destruction: Vec<Option<usize>>,
}

impl ModeConnections {
    fn empty(mode: usize, n_blocks: usize) -> Self {
        Self {
            mode,
            creation: vec![None; n_blocks],
            destruction: vec![None; n_blocks],
        }
    }

    /// Table for `direction`.
    pub fn table(&self, direction: Direction) -> &[Option<usize>] {
        match direction {
            Direction::Creation => &self.creation,
            Direction::Destruction => &self.destruction,
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut Vec<Option<usize>> {
        match direction {
            Direction::Creation => &mut self.creation,
            Direction::Destruction => &mut self.destruction,
        }
    }
}

/// Connectivity graph between subspaces under single-mode operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connectivity {
    modes: Vec<ModeConnections>,
}

impl Connectivity {
    /// Number of modes covered.
    pub fn n_modes(&self) -> usize {
        self.modes.len()
    }

    /// Per-mode tables in mode order.
    pub fn modes(&self) -> &[ModeConnections] {
        &self.modes
    }

    /// Table of `mode` in `direction`.
    pub fn table(&self, mode: usize, direction: Direction) -> Result<&[Option<usize>], FockError> {
        self.modes
            .get(mode)
            .map(|m| m.table(direction))
            .ok_or_else(|| FockError::index_out_of_range("mode", mode as u64, self.modes.len()))
    }

    /// Block reached from `origin` by the operator of `mode` in `direction`.
    pub fn target(
        &self,
        mode: usize,
        direction: Direction,
        origin: usize,
    ) -> Result<Option<usize>, FockError> {
        let table = self.table(mode, direction)?;
        table
            .get(origin)
            .copied()
            .ok_or_else(|| FockError::index_out_of_range("block", origin as u64, table.len()))
    }

    /// Table of `mode` in `direction` with `-1` marking origins that map to zero.
    pub fn to_index_table(&self, mode: usize, direction: Direction) -> Result<Vec<i64>, FockError> {
        Ok(self
            .table(mode, direction)?
            .iter()
            .map(|target| target.map_or(-1, |block| block as i64))
            .collect())
    }

    /// Total number of recorded edges.
    pub fn n_edges(&self) -> usize {
        self.modes
            .iter()
            .flat_map(|m| m.creation.iter().chain(&m.destruction))
            .filter(|target| target.is_some())
            .count()
    }
}

/// Derives the connectivity of every mode, in parallel over modes.
///
/// The first failing mode in index order determines the returned error.
pub fn build_connectivity(
    partition: &Partition,
    qn_ops: &[ImperativeOperator],
    opts: &SortOpts,
) -> Result<Connectivity, FockError> {
    let n_modes = partition.full_space().n_modes();
    let pool = opts.thread_pool()?;
    let results: Vec<Result<ModeConnections, FockError>> = pool.install(|| {
        (0..n_modes)
            .into_par_iter()
            .map(|mode| connect_mode(partition, qn_ops, mode, opts.norm_threshold))
            .collect()
    });
    let modes = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let connectivity = Connectivity { modes };
    info!(
        modes = n_modes,
        edges = connectivity.n_edges(),
        "built subspace connectivity"
    );
    Ok(connectivity)
}

fn connect_mode(
    partition: &Partition,
    qn_ops: &[ImperativeOperator],
    mode: usize,
    norm_threshold: f64,
) -> Result<ModeConnections, FockError> {
    let full = partition.full_space();
    let mut connections = ModeConnections::empty(mode, partition.n_subspaces());
    for direction in Direction::ALL {
        let op = ImperativeOperator::canonical(direction.is_creation(), mode, full.n_modes())?;
        for state in full.states() {
            let image = SparseState::basis(state).apply(&op);
            let Some(image) = normalized_image(&image, norm_threshold, mode, direction, state)?
            else {
                continue;
            };
            let qn = evaluate(&image, qn_ops);
            let target = partition.resolve(&qn).ok_or_else(|| {
                FockError::Block(
                    ErrorInfo::new(
                        "unresolved-quantum-numbers",
                        "operator image has quantum numbers matching no subspace",
                    )
                    .with_context("mode", mode)
                    .with_context("direction", direction.label())
                    .with_context("state", state)
                    .with_context("qn", format!("{:?}", qn.values())),
                )
            })?;
            let origin = partition.block_of(state)?;
            record(&mut connections, direction, origin, target, state)?;
        }
    }
    debug!(mode, "connected mode");
    Ok(connections)
}

/// Unit-norm image, or `None` when the operator annihilates `state`.
fn normalized_image(
    image: &SparseState,
    norm_threshold: f64,
    mode: usize,
    direction: Direction,
    state: FockState,
) -> Result<Option<SparseState>, FockError> {
    let norm_sq = image.norm_sq();
    if !norm_sq.is_finite() {
        return Err(FockError::Operator(
            ErrorInfo::new("non-finite-image", "operator image has a non-finite norm")
                .with_context("mode", mode)
                .with_context("direction", direction.label())
                .with_context("state", state)
                .with_context("norm_sq", norm_sq),
        ));
    }
    if norm_sq <= norm_threshold {
        return Ok(None);
    }
    Ok(image.normalized())
}

fn record(
    connections: &mut ModeConnections,
    direction: Direction,
    origin: usize,
    target: usize,
    state: FockState,
) -> Result<(), FockError> {
    let mode = connections.mode;
    let slot = &mut connections.table_mut(direction)[origin];
    match *slot {
        None => {
            *slot = Some(target);
            Ok(())
        }
        Some(existing) if existing == target => Ok(()),
        Some(existing) => Err(FockError::Block(
            ErrorInfo::new(
                "inconsistent-connection",
                "operator maps one subspace onto two different subspaces",
            )
            .with_context("mode", mode)
            .with_context("direction", direction.label())
            .with_context("origin_block", origin)
            .with_context("state", state)
            .with_context("existing_target", existing)
            .with_context("new_target", target)
            .with_hint("the quantum numbers do not resolve the block structure; add the missing conserved quantities"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annihilated_images_are_skipped() {
        let image = SparseState::from_pairs([(3, 1e-6)]);
        let out = normalized_image(&image, 1e-10, 0, Direction::Creation, 1).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn images_are_normalized() {
        let image = SparseState::from_pairs([(1, 3.0), (2, -4.0)]);
        let out = normalized_image(&image, 1e-10, 0, Direction::Destruction, 3)
            .unwrap()
            .expect("image");
        assert!((out.norm_sq() - 1.0).abs() < 1e-12);
        assert!((out.amplitude(2) + 0.8).abs() < 1e-12);
    }

    #[test]
    fn non_finite_images_are_rejected() {
        for amp in [f64::NAN, f64::INFINITY] {
            let image = SparseState::from_pairs([(5, amp)]);
            let err = normalized_image(&image, 1e-10, 2, Direction::Creation, 4).unwrap_err();
            assert!(matches!(err, FockError::Operator(_)));
            assert_eq!(err.code(), "non-finite-image");
            assert_eq!(err.info().context.get("mode").map(String::as_str), Some("2"));
            assert_eq!(err.info().context.get("state").map(String::as_str), Some("4"));
        }
    }
}
