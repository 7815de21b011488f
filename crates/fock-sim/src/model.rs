use std::error::Error;
use std::fs;
use std::path::Path;

use fock_blocks::SortOpts;
use fock_core::errors::{ErrorInfo, FockError};
use fock_ops::{
    build_model, BlockDesc, CanonicalOp, FundamentalOperatorSet, IndexLabel, ManyBodyOperator,
    ModeLabel, Model, ModelPreset, Term,
};
use serde::{Deserialize, Serialize};

/// One canonical operator written with its physical label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpSpec {
    /// `true` for `c†`.
    #[serde(default)]
    pub dagger: bool,
    /// Block name of the mode.
    pub block: String,
    /// Index of the mode inside its block.
    pub index: IndexLabel,
}

/// Coefficient times a product of labelled operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    /// Real coefficient.
    pub coef: f64,
    /// Operators written left to right.
    #[serde(default)]
    pub ops: Vec<OpSpec>,
}

/// Model description accepted by `fock-sim decompose`, in YAML or JSON.
///
/// Either `preset` or the explicit `blocks`/`hamiltonian`/`quantum_numbers`
/// triple must be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Generated model.
    #[serde(default)]
    pub preset: Option<ModelPreset>,
    /// Mode blocks in linear-index order.
    #[serde(default)]
    pub blocks: Vec<BlockDesc>,
    /// Hamiltonian terms.
    #[serde(default)]
    pub hamiltonian: Vec<TermSpec>,
    /// One term list per conserved quantity.
    #[serde(default)]
    pub quantum_numbers: Vec<Vec<TermSpec>>,
    /// Decomposition options.
    #[serde(default)]
    pub options: SortOpts,
}

impl ModelFile {
    /// Reads a model file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let model = if is_json {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        Ok(model)
    }

    /// Resolves labels and builds the model.
    pub fn to_model(&self) -> Result<Model, FockError> {
        if let Some(preset) = &self.preset {
            if !self.blocks.is_empty() || !self.hamiltonian.is_empty() {
                return Err(FockError::Config(
                    ErrorInfo::new("ambiguous-model", "model file sets both a preset and explicit terms")
                        .with_hint("remove either `preset` or `blocks`/`hamiltonian`"),
                ));
            }
            return build_model(preset);
        }
        if self.blocks.is_empty() {
            return Err(FockError::config("empty-model", "model file declares no mode blocks"));
        }
        let fops = FundamentalOperatorSet::from_blocks(&self.blocks)?;
        let hamiltonian = resolve_terms(&fops, &self.hamiltonian)?;
        let quantum_numbers = self
            .quantum_numbers
            .iter()
            .map(|terms| resolve_terms(&fops, terms))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Model {
            blocks: self.blocks.clone(),
            hamiltonian,
            quantum_numbers,
            seed: None,
        })
    }
}

fn resolve_terms(
    fops: &FundamentalOperatorSet,
    terms: &[TermSpec],
) -> Result<ManyBodyOperator, FockError> {
    let mut resolved = Vec::with_capacity(terms.len());
    for term in terms {
        let ops = term
            .ops
            .iter()
            .map(|op| {
                let label = ModeLabel::new(op.block.clone(), op.index.clone());
                Ok(CanonicalOp {
                    dagger: op.dagger,
                    mode: fops.linear_index(&label)?,
                })
            })
            .collect::<Result<Vec<_>, FockError>>()?;
        resolved.push(Term {
            coef: term.coef,
            ops,
        });
    }
    Ok(ManyBodyOperator::from_terms(resolved))
}
