use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use fock_blocks::{decomposition_report, spectrum_export, DecompositionReport, SortOpts, SortedSpaces};
use fock_core::RunProvenance;
use fock_ops::{stable_hash_string, to_canonical_json_bytes, Model};
use serde::Serialize;
use tracing::info;

fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_canonical_json_bytes(value)?)?;
    Ok(())
}

/// Decomposes `model`, writes the artefacts under `out` and prints the block report.
pub fn decompose_and_write<T: Serialize>(
    model: &Model,
    opts: SortOpts,
    input: &T,
    out: &Path,
) -> Result<DecompositionReport, Box<dyn Error>> {
    fs::create_dir_all(out)?;
    let sorted = SortedSpaces::new(
        &model.hamiltonian,
        &model.quantum_numbers,
        model.fundamental_set()?,
        &model.blocks,
        opts,
    )?;

    let mut report = decomposition_report(&sorted)?;
    report.provenance = Some(RunProvenance {
        input_hash: stable_hash_string(input)?,
        hamiltonian_hash: report.hamiltonian_hash.clone(),
        quantum_numbers_hash: report.quantum_numbers_hash.clone(),
        seed: model.seed,
        created_at: chrono::Utc::now().to_rfc3339(),
        tool_versions: BTreeMap::from([(
            "fock-sim".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        )]),
    });

    write_json(out.join("report.json"), &report)?;
    write_json(out.join("connectivity.json"), sorted.connectivity())?;
    write_json(out.join("spectrum.json"), &spectrum_export(&sorted))?;
    info!(out = %out.display(), hash = %report.report_hash, "wrote decomposition artefacts");

    print!("{sorted}");
    Ok(report)
}
