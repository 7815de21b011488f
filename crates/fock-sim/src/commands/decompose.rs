use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use crate::model::ModelFile;
use crate::output::decompose_and_write;

#[derive(Args, Debug)]
pub struct DecomposeArgs {
    /// YAML or JSON model description.
    #[arg(long)]
    pub model: PathBuf,
    /// Output directory for the decomposition artefacts.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker threads, overriding the model file's options.
    #[arg(long)]
    pub concurrency: Option<usize>,
}

pub fn run(args: &DecomposeArgs) -> Result<(), Box<dyn Error>> {
    let file = ModelFile::load(&args.model)?;
    let model = file.to_model()?;
    let mut opts = file.options.clone();
    if let Some(concurrency) = args.concurrency {
        opts.concurrency = concurrency;
    }
    decompose_and_write(&model, opts, &file, &args.out)?;
    Ok(())
}
