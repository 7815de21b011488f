use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Coefficients below this magnitude are dropped when terms are coalesced.
const ZERO_COEF: f64 = 1e-14;

/// A single canonical operator `c†_mode` (`dagger = true`) or `c_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalOp {
    /// Whether the operator creates (`true`) or destroys (`false`) a fermion.
    pub dagger: bool,
    /// Linear index of the mode.
    pub mode: usize,
}

impl CanonicalOp {
    /// Returns the Hermitian conjugate of the operator.
    pub fn conjugate(self) -> Self {
        Self {
            dagger: !self.dagger,
            mode: self.mode,
        }
    }
}

/// Coefficient times an ordered product of canonical operators.
///
/// Operators are written left to right and act right to left; an empty
/// product is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Real coefficient of the product.
    pub coef: f64,
    /// Ordered canonical operators.
    #[serde(default)]
    pub ops: Vec<CanonicalOp>,
}

/// Real many-body operator expressed as a sum of [`Term`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManyBodyOperator {
    terms: Vec<Term>,
}

impl ManyBodyOperator {
    /// The zero operator.
    pub fn zero() -> Self {
        Self::default()
    }

    /// `value` times the identity.
    pub fn constant(value: f64) -> Self {
        Self::from_terms(vec![Term {
            coef: value,
            ops: Vec::new(),
        }])
    }

    /// Canonical operator of the given direction on `mode`.
    pub fn canonical(dagger: bool, mode: usize) -> Self {
        Self::from_terms(vec![Term {
            coef: 1.0,
            ops: vec![CanonicalOp { dagger, mode }],
        }])
    }

    /// Creation operator `c†_mode`.
    pub fn c_dag(mode: usize) -> Self {
        Self::canonical(true, mode)
    }

    /// Annihilation operator `c_mode`.
    pub fn c(mode: usize) -> Self {
        Self::canonical(false, mode)
    }

    /// Occupation number operator `n_mode = c†_mode c_mode`.
    pub fn n(mode: usize) -> Self {
        Self::c_dag(mode) * Self::c(mode)
    }

    /// Builds an operator from raw terms, merging identical products.
    pub fn from_terms(terms: Vec<Term>) -> Self {
        let mut merged: BTreeMap<Vec<CanonicalOp>, f64> = BTreeMap::new();
        let mut order: Vec<Vec<CanonicalOp>> = Vec::new();
        for term in terms {
            match merged.get_mut(&term.ops) {
                Some(coef) => *coef += term.coef,
                None => {
                    order.push(term.ops.clone());
                    merged.insert(term.ops, term.coef);
                }
            }
        }
        let terms = order
            .into_iter()
            .filter_map(|ops| {
                let coef = merged.get(&ops).copied().unwrap_or_default();
                (coef.abs() > ZERO_COEF).then_some(Term { coef, ops })
            })
            .collect();
        Self { terms }
    }

    /// Terms of the expression in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns `true` when no term survives.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest mode index referenced by the expression, if any.
    pub fn max_mode(&self) -> Option<usize> {
        self.terms
            .iter()
            .flat_map(|term| term.ops.iter().map(|op| op.mode))
            .max()
    }

    /// Hermitian conjugate (coefficients are real).
    pub fn dagger(&self) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|term| Term {
                coef: term.coef,
                ops: term.ops.iter().rev().map(|op| op.conjugate()).collect(),
            })
            .collect();
        Self::from_terms(terms)
    }

    /// Returns `self - shift * 1`.
    pub fn shifted(&self, shift: f64) -> Self {
        self.clone() - Self::constant(shift)
    }
}

impl Add for ManyBodyOperator {
    type Output = ManyBodyOperator;

    fn add(self, rhs: ManyBodyOperator) -> ManyBodyOperator {
        let mut terms = self.terms;
        terms.extend(rhs.terms);
        ManyBodyOperator::from_terms(terms)
    }
}

impl AddAssign for ManyBodyOperator {
    fn add_assign(&mut self, rhs: ManyBodyOperator) {
        let lhs = std::mem::take(self);
        *self = lhs + rhs;
    }
}

impl Sub for ManyBodyOperator {
    type Output = ManyBodyOperator;

    fn sub(self, rhs: ManyBodyOperator) -> ManyBodyOperator {
        self + (-rhs)
    }
}

impl Neg for ManyBodyOperator {
    type Output = ManyBodyOperator;

    fn neg(self) -> ManyBodyOperator {
        self * -1.0
    }
}

impl Mul for ManyBodyOperator {
    type Output = ManyBodyOperator;

    fn mul(self, rhs: ManyBodyOperator) -> ManyBodyOperator {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for left in &self.terms {
            for right in &rhs.terms {
                let mut ops = left.ops.clone();
                ops.extend(right.ops.iter().copied());
                terms.push(Term {
                    coef: left.coef * right.coef,
                    ops,
                });
            }
        }
        ManyBodyOperator::from_terms(terms)
    }
}

impl Mul<f64> for ManyBodyOperator {
    type Output = ManyBodyOperator;

    fn mul(self, rhs: f64) -> ManyBodyOperator {
        let terms = self
            .terms
            .into_iter()
            .map(|term| Term {
                coef: term.coef * rhs,
                ops: term.ops,
            })
            .collect();
        ManyBodyOperator::from_terms(terms)
    }
}

impl Mul<ManyBodyOperator> for f64 {
    type Output = ManyBodyOperator;

    fn mul(self, rhs: ManyBodyOperator) -> ManyBodyOperator {
        rhs * self
    }
}

/// Total particle number `sum_i n_i` over the listed modes.
pub fn particle_number(modes: impl IntoIterator<Item = usize>) -> ManyBodyOperator {
    modes
        .into_iter()
        .fold(ManyBodyOperator::zero(), |acc, mode| acc + ManyBodyOperator::n(mode))
}

/// Hopping term `t (c†_i c_j + c†_j c_i)`.
pub fn hopping(t: f64, i: usize, j: usize) -> ManyBodyOperator {
    t * (ManyBodyOperator::c_dag(i) * ManyBodyOperator::c(j)
        + ManyBodyOperator::c_dag(j) * ManyBodyOperator::c(i))
}
