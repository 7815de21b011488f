//! Fermionic many-body operators and their action on Fock states.
//!
//! This crate is the operator-algebra collaborator of the block
//! decomposition: it labels modes, builds operator expressions, compiles
//! them to bitmask form and applies them to sparse states.

pub mod expr;
pub mod fundamental;
pub mod hash;
pub mod imperative;
pub mod models;
pub mod serde;
pub mod state;

pub use expr::{hopping, particle_number, CanonicalOp, ManyBodyOperator, Term};
pub use fundamental::{BlockDesc, FundamentalOperatorSet, IndexLabel, ModeLabel};
pub use hash::stable_hash_string;
pub use imperative::ImperativeOperator;
pub use models::{
    build_model, hubbard_chain, random_hopping, HubbardChain, Model, ModelPreset, RandomHopping,
};
pub use serde::{from_json_slice, to_canonical_json_bytes};
pub use state::SparseState;
