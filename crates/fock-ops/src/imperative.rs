//! Compiled form of a [`ManyBodyOperator`] acting directly on bitmasks.

use fock_core::errors::{ErrorInfo, FockError};
use fock_core::{FockOperator, FockState, MAX_MODES};

use crate::expr::ManyBodyOperator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BitOp {
    dagger: bool,
    mask: FockState,
}

#[derive(Debug, Clone, PartialEq)]
struct CompiledTerm {
    coef: f64,
    // Stored in application order (rightmost operator first).
    ops: Vec<BitOp>,
}

/// Operator ready to act on Fock states of an `n_modes` space.
///
/// Fermionic signs follow the Jordan–Wigner convention: acting on mode `i`
/// picks up `(-1)^k` where `k` is the number of occupied modes below `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImperativeOperator {
    n_modes: usize,
    terms: Vec<CompiledTerm>,
}

impl ImperativeOperator {
    /// Compiles `op` for a space of `n_modes` modes.
    pub fn new(op: &ManyBodyOperator, n_modes: usize) -> Result<Self, FockError> {
        if n_modes > MAX_MODES {
            return Err(FockError::Operator(
                ErrorInfo::new("too-many-modes", "operator space exceeds the supported mode count")
                    .with_context("modes", n_modes),
            ));
        }
        let mut terms = Vec::with_capacity(op.terms().len());
        for term in op.terms() {
            let mut ops = Vec::with_capacity(term.ops.len());
            for canonical in term.ops.iter().rev() {
                if canonical.mode >= n_modes {
                    return Err(FockError::Operator(
                        ErrorInfo::new("mode-out-of-range", "operator references an unknown mode")
                            .with_context("mode", canonical.mode)
                            .with_context("modes", n_modes),
                    ));
                }
                ops.push(BitOp {
                    dagger: canonical.dagger,
                    mask: 1 << canonical.mode,
                });
            }
            terms.push(CompiledTerm {
                coef: term.coef,
                ops,
            });
        }
        Ok(Self { n_modes, terms })
    }

    /// Compiles the single canonical operator `c†_mode` or `c_mode`.
    pub fn canonical(dagger: bool, mode: usize, n_modes: usize) -> Result<Self, FockError> {
        Self::new(&ManyBodyOperator::canonical(dagger, mode), n_modes)
    }

    /// Number of modes of the target space.
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    /// Number of compiled terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }
}

fn act_term(term: &CompiledTerm, state: FockState) -> Option<(FockState, f64)> {
    let mut current = state;
    let mut sign = 1.0;
    for op in &term.ops {
        let occupied = current & op.mask != 0;
        if occupied == op.dagger {
            return None;
        }
        if (current & (op.mask - 1)).count_ones() % 2 == 1 {
            sign = -sign;
        }
        current ^= op.mask;
    }
    Some((current, sign * term.coef))
}

impl FockOperator for ImperativeOperator {
    fn act(&self, state: FockState, out: &mut Vec<(FockState, f64)>) {
        out.extend(self.terms.iter().filter_map(|term| act_term(term, state)));
    }
}
