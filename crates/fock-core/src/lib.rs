#![deny(missing_docs)]
#![doc = "Core traits and data types shared by the Fock space block decomposition crates."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, FockError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Occupation bitmask over the ordered modes; bit `i` set means mode `i` is occupied.
pub type FockState = u64;

/// Largest number of modes for which the full space can be enumerated.
pub const MAX_MODES: usize = 30;

/// Returns `2^n_modes`, failing when the space cannot be enumerated.
pub fn full_dimension(n_modes: usize) -> Result<usize, FockError> {
    if n_modes > MAX_MODES {
        return Err(FockError::Operator(
            ErrorInfo::new(
                "too-many-modes",
                format!("cannot enumerate a Fock space over {n_modes} modes"),
            )
            .with_context("modes", n_modes)
            .with_context("max_modes", MAX_MODES),
        ));
    }
    Ok(1usize << n_modes)
}

/// Direction of a canonical fermionic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Creation operator `c†`.
    Creation,
    /// Annihilation (destruction) operator `c`.
    Destruction,
}

impl Direction {
    /// Both directions in canonical order.
    pub const ALL: [Direction; 2] = [Direction::Creation, Direction::Destruction];

    /// Returns `true` for [`Direction::Creation`].
    pub fn is_creation(self) -> bool {
        matches!(self, Direction::Creation)
    }

    /// Short label used in reports and error contexts.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Creation => "creation",
            Direction::Destruction => "destruction",
        }
    }
}

/// Describes the indexing contract of a space spanned by Fock states.
pub trait HilbertSpace: Send + Sync {
    /// Returns the number of basis states.
    fn dimension(&self) -> usize;

    /// Returns the Fock state stored at `index`.
    fn state_at(&self, index: usize) -> Result<FockState, FockError>;

    /// Returns the basis index of `state`.
    fn index_of(&self, state: FockState) -> Result<usize, FockError>;
}

/// Black-box contract of an operator acting on single Fock states.
///
/// The decomposition never inspects operator internals; it only asks for the
/// image of a basis state as a list of `(state, amplitude)` pairs.
pub trait FockOperator: Send + Sync {
    /// Appends the image of `state` to `out`. Repeated states may appear and
    /// are summed by the caller.
    fn act(&self, state: FockState, out: &mut Vec<(FockState, f64)>);

    /// Returns the image of `state` as a freshly allocated list.
    fn image(&self, state: FockState) -> Vec<(FockState, f64)> {
        let mut out = Vec::new();
        self.act(state, &mut out);
        out
    }
}
