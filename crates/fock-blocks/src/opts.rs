use fock_core::errors::{ErrorInfo, FockError};
use serde::{Deserialize, Serialize};

fn default_epsilon() -> f64 {
    1e-8
}

fn default_digits() -> u32 {
    8
}

fn default_norm_threshold() -> f64 {
    1e-10
}

fn default_symmetry_tol() -> f64 {
    1e-9
}

fn default_concurrency() -> usize {
    1
}

/// How quantum-number vectors are keyed when assigning states to subspaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QnPolicy {
    /// Component-wise comparison with an absolute tolerance; the first vector
    /// seen for a subspace is its canonical key.
    Tolerant {
        /// Absolute tolerance per component.
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
    /// Components are rounded to `digits` significant digits and compared exactly.
    Rounded {
        /// Number of significant digits kept.
        #[serde(default = "default_digits")]
        digits: u32,
    },
}

impl Default for QnPolicy {
    fn default() -> Self {
        QnPolicy::Tolerant {
            epsilon: default_epsilon(),
        }
    }
}

/// Options controlling the decomposition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SortOpts {
    /// Quantum number keying policy.
    #[serde(default)]
    pub qn_policy: QnPolicy,
    /// Squared norm below which an operator image counts as the null vector.
    #[serde(default = "default_norm_threshold")]
    pub norm_threshold: f64,
    /// Largest tolerated asymmetry of a block matrix before a warning is emitted.
    #[serde(default = "default_symmetry_tol")]
    pub symmetry_tol: f64,
    /// Iteration cap handed to the eigensolver (0 = until convergence).
    #[serde(default)]
    pub max_eigen_iterations: usize,
    /// Worker threads used for connectivity and diagonalization.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SortOpts {
    fn default() -> Self {
        Self {
            qn_policy: QnPolicy::default(),
            norm_threshold: default_norm_threshold(),
            symmetry_tol: default_symmetry_tol(),
            max_eigen_iterations: 0,
            concurrency: default_concurrency(),
        }
    }
}

fn invalid(field: &str, value: impl ToString, message: &str) -> FockError {
    FockError::Config(
        ErrorInfo::new("invalid-option", message)
            .with_context("field", field)
            .with_context("value", value),
    )
}

impl SortOpts {
    /// Checks that every option is usable.
    pub fn validate(&self) -> Result<(), FockError> {
        match self.qn_policy {
            QnPolicy::Tolerant { epsilon } if !(epsilon.is_finite() && epsilon >= 0.0) => {
                return Err(invalid("qn_policy.epsilon", epsilon, "tolerance must be finite and non-negative"));
            }
            QnPolicy::Rounded { digits } if !(1..=15).contains(&digits) => {
                return Err(invalid("qn_policy.digits", digits, "digits must lie in 1..=15"));
            }
            _ => {}
        }
        if !(self.norm_threshold.is_finite() && self.norm_threshold >= 0.0) {
            return Err(invalid(
                "norm_threshold",
                self.norm_threshold,
                "norm threshold must be finite and non-negative",
            ));
        }
        if !(self.symmetry_tol.is_finite() && self.symmetry_tol >= 0.0) {
            return Err(invalid(
                "symmetry_tol",
                self.symmetry_tol,
                "symmetry tolerance must be finite and non-negative",
            ));
        }
        if self.concurrency == 0 {
            return Err(invalid("concurrency", 0, "at least one worker thread is required"));
        }
        Ok(())
    }
}

impl SortOpts {
    pub(crate) fn thread_pool(&self) -> Result<rayon::ThreadPool, FockError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency.max(1))
            .build()
            .map_err(|err| FockError::config("thread-pool", err.to_string()))
    }
}
