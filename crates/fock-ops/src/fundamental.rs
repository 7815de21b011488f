//! Mode labels and the bijection between physical labels and linear indices.

use std::collections::BTreeMap;
use std::fmt;

use fock_core::errors::{ErrorInfo, FockError};
use serde::{Deserialize, Serialize};

/// Index label inside a block: either an integer or a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexLabel {
    /// Integer index such as an orbital number.
    Int(i64),
    /// Named index such as `"up"`.
    Str(String),
}

impl fmt::Display for IndexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexLabel::Int(value) => write!(f, "{value}"),
            IndexLabel::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for IndexLabel {
    fn from(value: i64) -> Self {
        IndexLabel::Int(value)
    }
}

impl From<&str> for IndexLabel {
    fn from(value: &str) -> Self {
        IndexLabel::Str(value.to_string())
    }
}

/// Physical label of a single fermionic mode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModeLabel {
    /// Name of the block the mode belongs to (e.g. a spin species).
    pub block: String,
    /// Index of the mode inside its block.
    pub index: IndexLabel,
}

impl ModeLabel {
    /// Creates a label from a block name and an inner index.
    pub fn new(block: impl Into<String>, index: impl Into<IndexLabel>) -> Self {
        Self {
            block: block.into(),
            index: index.into(),
        }
    }
}

impl fmt::Display for ModeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.block, self.index)
    }
}

/// Describes one block of the physical block structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDesc {
    /// Block name shared by every mode of the block.
    pub name: String,
    /// Inner indices in block order.
    pub indices: Vec<IndexLabel>,
}

impl BlockDesc {
    /// Creates a block with integer indices `0..size`.
    pub fn with_size(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            indices: (0..size as i64).map(IndexLabel::Int).collect(),
        }
    }

    /// Iterates over the labels of the block's modes in order.
    pub fn labels(&self) -> impl Iterator<Item = ModeLabel> + '_ {
        self.indices
            .iter()
            .map(move |index| ModeLabel::new(self.name.clone(), index.clone()))
    }
}

/// Ordered set of fundamental modes with stable linear indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ModeLabel>", into = "Vec<ModeLabel>")]
pub struct FundamentalOperatorSet {
    labels: Vec<ModeLabel>,
    lookup: BTreeMap<ModeLabel, usize>,
}

impl FundamentalOperatorSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set by enumerating the blocks in order.
    pub fn from_blocks(blocks: &[BlockDesc]) -> Result<Self, FockError> {
        let mut set = Self::new();
        for block in blocks {
            for label in block.labels() {
                set.insert(label)?;
            }
        }
        Ok(set)
    }

    /// Creates `n` anonymous modes in a single block named `"c"`.
    pub fn anonymous(n: usize) -> Self {
        let labels: Vec<ModeLabel> = (0..n as i64).map(|i| ModeLabel::new("c", i)).collect();
        Self::from_labels(labels)
    }

    fn from_labels(labels: Vec<ModeLabel>) -> Self {
        let lookup = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), idx))
            .collect();
        Self { labels, lookup }
    }

    /// Appends a mode and returns its linear index.
    pub fn insert(&mut self, label: ModeLabel) -> Result<usize, FockError> {
        if self.lookup.contains_key(&label) {
            return Err(FockError::Operator(
                ErrorInfo::new("duplicate-mode", "mode label already registered")
                    .with_context("label", &label),
            ));
        }
        let idx = self.labels.len();
        self.lookup.insert(label.clone(), idx);
        self.labels.push(label);
        Ok(idx)
    }

    /// Number of modes.
    pub fn n_operators(&self) -> usize {
        self.labels.len()
    }

    /// Returns the linear index of `label`.
    pub fn linear_index(&self, label: &ModeLabel) -> Result<usize, FockError> {
        self.lookup.get(label).copied().ok_or_else(|| {
            FockError::Operator(
                ErrorInfo::new("unknown-mode", "mode label is not part of the operator set")
                    .with_context("label", label),
            )
        })
    }

    /// Returns the label of the mode with linear index `idx`.
    pub fn label(&self, idx: usize) -> Option<&ModeLabel> {
        self.labels.get(idx)
    }

    /// Iterates over `(linear index, label)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ModeLabel)> {
        self.labels.iter().enumerate()
    }

    /// Maps every `(block position, position in block)` pair of `blocks` to a linear index.
    pub fn block_lookup(
        &self,
        blocks: &[BlockDesc],
    ) -> Result<BTreeMap<(usize, usize), usize>, FockError> {
        let mut map = BTreeMap::new();
        for (bl, block) in blocks.iter().enumerate() {
            for (offset, label) in block.labels().enumerate() {
                map.insert((bl, offset), self.linear_index(&label)?);
            }
        }
        Ok(map)
    }
}

impl From<Vec<ModeLabel>> for FundamentalOperatorSet {
    fn from(labels: Vec<ModeLabel>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<FundamentalOperatorSet> for Vec<ModeLabel> {
    fn from(set: FundamentalOperatorSet) -> Self {
        set.labels
    }
}
