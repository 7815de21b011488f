use fock_core::errors::FockError;
use fock_core::RngHandle;
use serde::{Deserialize, Serialize};

use crate::expr::{hopping, particle_number, ManyBodyOperator};
use crate::fundamental::{BlockDesc, FundamentalOperatorSet};

fn default_hopping() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

/// Hamiltonian together with its mode set and conserved quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Block structure the modes were generated from.
    pub blocks: Vec<BlockDesc>,
    /// Hamiltonian expression.
    pub hamiltonian: ManyBodyOperator,
    /// Ordered conserved quantities.
    pub quantum_numbers: Vec<ManyBodyOperator>,
    /// Seed used for randomised couplings, if any.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Model {
    /// Builds the fundamental operator set of the model.
    pub fn fundamental_set(&self) -> Result<FundamentalOperatorSet, FockError> {
        FundamentalOperatorSet::from_blocks(&self.blocks)
    }
}

/// Single-band Hubbard chain with spin-resolved particle numbers as conserved quantities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HubbardChain {
    /// Number of lattice sites.
    pub sites: usize,
    /// Nearest-neighbour hopping amplitude.
    #[serde(default = "default_hopping")]
    pub t: f64,
    /// On-site interaction.
    #[serde(default)]
    pub u: f64,
    /// Chemical potential.
    #[serde(default)]
    pub mu: f64,
    /// Close the chain into a ring.
    #[serde(default)]
    pub periodic: bool,
}

/// Random symmetric hopping model conserving the total particle number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomHopping {
    /// Number of modes.
    pub modes: usize,
    /// Couplings are drawn from `[-scale, scale)`.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Master seed for the coupling substreams.
    pub seed: u64,
}

/// Presets understood by [`build_model`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModelPreset {
    /// See [`HubbardChain`].
    HubbardChain(HubbardChain),
    /// See [`RandomHopping`].
    RandomHopping(RandomHopping),
}

/// Generates the model described by `preset`.
pub fn build_model(preset: &ModelPreset) -> Result<Model, FockError> {
    match preset {
        ModelPreset::HubbardChain(params) => hubbard_chain(params),
        ModelPreset::RandomHopping(params) => random_hopping(params),
    }
}

/// Builds a Hubbard chain with modes ordered `up[0..L]` then `down[0..L]`.
pub fn hubbard_chain(params: &HubbardChain) -> Result<Model, FockError> {
    if params.sites == 0 {
        return Err(FockError::config(
            "empty-model",
            "hubbard chain requires at least one site",
        ));
    }
    let l = params.sites;
    let up = |site: usize| site;
    let down = |site: usize| l + site;

    let mut bonds: Vec<(usize, usize)> = (0..l.saturating_sub(1)).map(|i| (i, i + 1)).collect();
    if params.periodic && l > 2 {
        bonds.push((l - 1, 0));
    }

    let mut hamiltonian = ManyBodyOperator::zero();
    for &(i, j) in &bonds {
        hamiltonian += hopping(-params.t, up(i), up(j));
        hamiltonian += hopping(-params.t, down(i), down(j));
    }
    for site in 0..l {
        let n_up = ManyBodyOperator::n(up(site));
        let n_down = ManyBodyOperator::n(down(site));
        hamiltonian += params.u * (n_up.clone() * n_down.clone());
        hamiltonian += -params.mu * (n_up + n_down);
    }

    Ok(Model {
        blocks: vec![BlockDesc::with_size("up", l), BlockDesc::with_size("down", l)],
        hamiltonian,
        quantum_numbers: vec![particle_number(0..l), particle_number(l..2 * l)],
        seed: None,
    })
}

/// Builds a random hopping model; coupling `(i, j)` comes from its own substream.
pub fn random_hopping(params: &RandomHopping) -> Result<Model, FockError> {
    if params.modes == 0 {
        return Err(FockError::config(
            "empty-model",
            "random hopping model requires at least one mode",
        ));
    }
    let n = params.modes;
    let mut hamiltonian = ManyBodyOperator::zero();
    for i in 0..n {
        for j in i..n {
            let mut rng = RngHandle::substream(params.seed, (i * n + j) as u64);
            let t = rng.coupling(params.scale);
            if i == j {
                hamiltonian += t * ManyBodyOperator::n(i);
            } else {
                hamiltonian += hopping(t, i, j);
            }
        }
    }

    Ok(Model {
        blocks: vec![BlockDesc::with_size("c", n)],
        hamiltonian,
        quantum_numbers: vec![particle_number(0..n)],
        seed: Some(params.seed),
    })
}
