use std::collections::BTreeMap;

use fock_core::errors::{ErrorInfo, FockError};
use fock_core::{full_dimension, FockState, HilbertSpace};

/// Full Fock space of `n_modes` modes; basis index and bitmask coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullHilbertSpace {
    n_modes: usize,
    dim: usize,
}

impl FullHilbertSpace {
    /// Builds the full space spanned by every occupation pattern of `n_modes` modes.
    pub fn new(n_modes: usize) -> Result<Self, FockError> {
        Ok(Self {
            n_modes,
            dim: full_dimension(n_modes)?,
        })
    }

    /// Number of modes spanning the space.
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    /// Iterates over every basis state in ascending order.
    pub fn states(&self) -> impl Iterator<Item = FockState> {
        0..self.dim as FockState
    }
}

impl HilbertSpace for FullHilbertSpace {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn state_at(&self, index: usize) -> Result<FockState, FockError> {
        if index >= self.dim {
            return Err(FockError::index_out_of_range("index", index as u64, self.dim));
        }
        Ok(index as FockState)
    }

    fn index_of(&self, state: FockState) -> Result<usize, FockError> {
        if state >= self.dim as FockState {
            return Err(FockError::index_out_of_range("state", state, self.dim));
        }
        Ok(state as usize)
    }
}

/// Invariant subspace: an ordered set of Fock states sharing quantum numbers.
///
/// Local indices follow insertion order and never change once the owning
/// partition is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubHilbertSpace {
    index: usize,
    fock_states: Vec<FockState>,
    fock_to_index: BTreeMap<FockState, usize>,
}

impl SubHilbertSpace {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            fock_states: Vec::new(),
            fock_to_index: BTreeMap::new(),
        }
    }

    pub(crate) fn add_fock_state(&mut self, state: FockState) {
        let local = self.fock_states.len();
        self.fock_states.push(state);
        self.fock_to_index.insert(state, local);
    }

    /// Block index of the subspace (its position in the registry).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Member states in local-index order.
    pub fn fock_states(&self) -> &[FockState] {
        &self.fock_states
    }

    /// Returns `true` when `state` belongs to the subspace.
    pub fn contains(&self, state: FockState) -> bool {
        self.fock_to_index.contains_key(&state)
    }
}

impl HilbertSpace for SubHilbertSpace {
    fn dimension(&self) -> usize {
        self.fock_states.len()
    }

    fn state_at(&self, index: usize) -> Result<FockState, FockError> {
        self.fock_states.get(index).copied().ok_or_else(|| {
            FockError::Range(
                ErrorInfo::new("index-out-of-range", "local index exceeds the subspace dimension")
                    .with_context("block", self.index)
                    .with_context("index", index)
                    .with_context("dimension", self.fock_states.len()),
            )
        })
    }

    fn index_of(&self, state: FockState) -> Result<usize, FockError> {
        self.fock_to_index.get(&state).copied().ok_or_else(|| {
            FockError::Range(
                ErrorInfo::new("state-not-in-subspace", "Fock state is not a member of the subspace")
                    .with_context("block", self.index)
                    .with_context("state", state),
            )
        })
    }
}
