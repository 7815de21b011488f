use std::cmp::Ordering;

use fock_ops::{ImperativeOperator, SparseState};
use serde::{Deserialize, Serialize};

use crate::opts::QnPolicy;

/// Expectation values of the conserved quantities for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantumNumbers(pub Vec<f64>);

impl QuantumNumbers {
    /// Components in operator order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Tolerant ordering: `a < b` iff the first component outside `epsilon` is smaller.
    ///
    /// Not transitive near the tolerance boundary.
    pub fn tolerant_cmp(&self, other: &Self, epsilon: f64) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            if *a < b - epsilon {
                return Ordering::Less;
            }
            if *b < a - epsilon {
                return Ordering::Greater;
            }
        }
        self.0.len().cmp(&other.0.len())
    }

    /// Rounds every component to `digits` significant digits.
    ///
    /// Components with magnitude at most `10^-digits` become exactly zero.
    pub fn rounded(&self, digits: u32) -> Self {
        Self(self.0.iter().map(|&x| round_significant(x, digits)).collect())
    }

    fn exact_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

fn round_significant(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    if x.abs() <= 10f64.powi(-(digits as i32)) {
        return 0.0;
    }
    let magnitude = x.abs().log10().floor() as i32;
    let exponent = digits as i32 - 1 - magnitude;
    let rounded = if exponent >= 0 {
        let scale = 10f64.powi(exponent);
        (x * scale).round() / scale
    } else {
        let scale = 10f64.powi(-exponent);
        (x / scale).round() * scale
    };
    // folds -0.0 into 0.0
    rounded + 0.0
}

/// Computes `<s|Q|s>` for every conserved quantity `Q`.
///
/// `state` is expected to be normalized.
pub fn evaluate(state: &SparseState, qn_ops: &[ImperativeOperator]) -> QuantumNumbers {
    QuantumNumbers(
        qn_ops
            .iter()
            .map(|op| state.dot(&state.apply(op)))
            .collect(),
    )
}

/// Ordered keyed lookup from quantum numbers to block index.
///
/// Keys are kept sorted under the policy's ordering and located by binary
/// search, so a tolerant key matches whatever the ordering calls equal.
#[derive(Debug, Clone, PartialEq)]
pub struct QnRegistry {
    policy: QnPolicy,
    keys: Vec<(QuantumNumbers, usize)>,
}

impl QnRegistry {
    /// Creates an empty registry.
    pub fn new(policy: QnPolicy) -> Self {
        Self {
            policy,
            keys: Vec::new(),
        }
    }

    /// Keying policy of the registry.
    pub fn policy(&self) -> QnPolicy {
        self.policy
    }

    fn key(&self, qn: &QuantumNumbers) -> QuantumNumbers {
        match self.policy {
            QnPolicy::Tolerant { .. } => qn.clone(),
            QnPolicy::Rounded { digits } => qn.rounded(digits),
        }
    }

    fn search(&self, key: &QuantumNumbers) -> Result<usize, usize> {
        match self.policy {
            QnPolicy::Tolerant { epsilon } => self
                .keys
                .binary_search_by(|(probe, _)| probe.tolerant_cmp(key, epsilon)),
            QnPolicy::Rounded { .. } => self.keys.binary_search_by(|(probe, _)| probe.exact_cmp(key)),
        }
    }

    /// Returns the block registered for `qn`, if any.
    pub fn lookup(&self, qn: &QuantumNumbers) -> Option<usize> {
        let key = self.key(qn);
        self.search(&key).ok().map(|pos| self.keys[pos].1)
    }

    /// Returns the block for `qn`, registering `next_block` when none matches.
    /// The boolean is `true` when a new key was inserted.
    pub fn lookup_or_insert(&mut self, qn: &QuantumNumbers, next_block: usize) -> (usize, bool) {
        let key = self.key(qn);
        match self.search(&key) {
            Ok(pos) => (self.keys[pos].1, false),
            Err(pos) => {
                self.keys.insert(pos, (key, next_block));
                (next_block, true)
            }
        }
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no key is registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerant_cmp_ignores_small_differences() {
        let a = QuantumNumbers(vec![1.0, 2.0]);
        let b = QuantumNumbers(vec![1.0 + 1e-10, 2.0 - 1e-10]);
        assert_eq!(a.tolerant_cmp(&b, 1e-8), Ordering::Equal);
        let c = QuantumNumbers(vec![1.0, 2.1]);
        assert_eq!(a.tolerant_cmp(&c, 1e-8), Ordering::Less);
        assert_eq!(c.tolerant_cmp(&a, 1e-8), Ordering::Greater);
    }

    #[test]
    fn rounding_keeps_significant_digits() {
        assert_eq!(round_significant(1.23456789, 3), 1.23);
        assert_eq!(round_significant(-0.0, 3), 0.0);
        assert_eq!(round_significant(1234.5, 2), 1200.0);
    }

    #[test]
    fn rounding_flushes_noise_to_zero() {
        let noise = 0.1 + 0.2 - 0.3;
        assert_ne!(noise, 0.0);
        assert_eq!(round_significant(noise, 8), 0.0);
        assert_eq!(round_significant(-noise, 8), 0.0);
        assert_eq!(round_significant(2e-8, 8), 2e-8);
        assert_eq!(round_significant(0.1 + 0.2, 8), 0.3);
    }

    #[test]
    fn registry_reuses_matching_keys() {
        let mut registry = QnRegistry::new(QnPolicy::default());
        assert_eq!(registry.lookup_or_insert(&QuantumNumbers(vec![2.0]), 0), (0, true));
        assert_eq!(registry.lookup_or_insert(&QuantumNumbers(vec![0.0]), 1), (1, true));
        assert_eq!(
            registry.lookup_or_insert(&QuantumNumbers(vec![2.0 + 1e-12]), 2),
            (0, false)
        );
        assert_eq!(registry.lookup(&QuantumNumbers(vec![0.0])), Some(1));
        assert_eq!(registry.lookup(&QuantumNumbers(vec![1.0])), None);
        assert_eq!(registry.len(), 2);
    }
}
