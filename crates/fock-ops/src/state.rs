use std::collections::BTreeMap;

use fock_core::{FockOperator, FockState};

/// Sparse real vector over Fock states of the full space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseState {
    amplitudes: BTreeMap<FockState, f64>,
}

impl SparseState {
    /// The null vector.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Normalized single-amplitude basis vector `|state>`.
    pub fn basis(state: FockState) -> Self {
        let mut amplitudes = BTreeMap::new();
        amplitudes.insert(state, 1.0);
        Self { amplitudes }
    }

    /// Accumulates `(state, amplitude)` pairs, summing repeated states.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (FockState, f64)>) -> Self {
        let mut out = Self::zero();
        for (state, amplitude) in pairs {
            out.add(state, amplitude);
        }
        out
    }

    /// Adds `amplitude` to the component on `state`.
    pub fn add(&mut self, state: FockState, amplitude: f64) {
        *self.amplitudes.entry(state).or_insert(0.0) += amplitude;
    }

    /// Component on `state` (zero when absent).
    pub fn amplitude(&self, state: FockState) -> f64 {
        self.amplitudes.get(&state).copied().unwrap_or(0.0)
    }

    /// Iterates over stored components in ascending state order.
    pub fn iter(&self) -> impl Iterator<Item = (FockState, f64)> + '_ {
        self.amplitudes.iter().map(|(&state, &amp)| (state, amp))
    }

    /// Number of stored components.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Inner product `<self|other>`.
    pub fn dot(&self, other: &SparseState) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .iter()
            .map(|(state, amp)| amp * large.amplitude(state))
            .sum()
    }

    /// Squared Euclidean norm.
    pub fn norm_sq(&self) -> f64 {
        self.amplitudes.values().map(|amp| amp * amp).sum()
    }

    /// Returns the vector scaled to unit norm, or `None` for the null vector.
    pub fn normalized(&self) -> Option<SparseState> {
        let norm = self.norm_sq().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        let amplitudes = self
            .amplitudes
            .iter()
            .map(|(&state, &amp)| (state, amp / norm))
            .collect();
        Some(Self { amplitudes })
    }

    /// Applies `op` to the vector: `op |self>`.
    pub fn apply(&self, op: &dyn FockOperator) -> SparseState {
        let mut out = SparseState::zero();
        let mut image = Vec::new();
        for (state, amp) in self.iter() {
            image.clear();
            op.act(state, &mut image);
            for &(target, coef) in &image {
                out.add(target, amp * coef);
            }
        }
        out
    }
}
