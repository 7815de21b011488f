use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use fock_blocks::SortOpts;
use fock_ops::{build_model, HubbardChain, ModelPreset, RandomHopping};

use crate::output::decompose_and_write;

#[derive(Args, Debug)]
pub struct PresetArgs {
    #[command(subcommand)]
    pub kind: PresetKind,
    /// Output directory for the decomposition artefacts.
    #[arg(long, global = true, default_value = "fock-out")]
    pub out: PathBuf,
    /// Worker threads used for connectivity and diagonalization.
    #[arg(long, global = true, default_value_t = 1)]
    pub concurrency: usize,
}

#[derive(Subcommand, Debug)]
pub enum PresetKind {
    /// Hubbard chain conserving the spin-resolved particle numbers.
    HubbardChain {
        /// Number of sites.
        #[arg(long)]
        sites: usize,
        /// Hopping amplitude.
        #[arg(long, default_value_t = 1.0)]
        t: f64,
        /// On-site interaction.
        #[arg(long, default_value_t = 0.0)]
        u: f64,
        /// Chemical potential.
        #[arg(long, default_value_t = 0.0)]
        mu: f64,
        /// Close the chain into a ring.
        #[arg(long)]
        periodic: bool,
    },
    /// Random hopping model conserving the total particle number.
    RandomHopping {
        /// Number of modes.
        #[arg(long)]
        modes: usize,
        /// Couplings are drawn from `[-scale, scale)`.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Master seed.
        #[arg(long)]
        seed: u64,
    },
}

impl PresetKind {
    fn to_preset(&self) -> ModelPreset {
        match *self {
            PresetKind::HubbardChain {
                sites,
                t,
                u,
                mu,
                periodic,
            } => ModelPreset::HubbardChain(HubbardChain {
                sites,
                t,
                u,
                mu,
                periodic,
            }),
            PresetKind::RandomHopping { modes, scale, seed } => {
                ModelPreset::RandomHopping(RandomHopping { modes, scale, seed })
            }
        }
    }
}

pub fn run(args: &PresetArgs) -> Result<(), Box<dyn Error>> {
    let preset = args.kind.to_preset();
    let model = build_model(&preset)?;
    let opts = SortOpts {
        concurrency: args.concurrency,
        ..SortOpts::default()
    };
    decompose_and_write(&model, opts, &preset, &args.out)?;
    Ok(())
}
