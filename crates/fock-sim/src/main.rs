use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    decompose::{self, DecomposeArgs},
    preset::{self, PresetArgs},
    version::{self, VersionArgs},
};
use tracing::Level;

mod commands;
mod model;
mod output;

#[derive(Parser, Debug)]
#[command(name = "fock-sim", about = "Fock space block decomposition CLI")]
struct Cli {
    /// Log level for diagnostics written to stderr.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decompose the model described by a YAML or JSON file.
    Decompose(DecomposeArgs),
    /// Decompose a generated model.
    Preset(PresetArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level: Level = cli.log_level.parse()?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Decompose(args) => decompose::run(&args),
        Command::Preset(args) => preset::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
