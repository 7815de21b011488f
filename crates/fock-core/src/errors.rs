//! Structured error types shared across the Fock space crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FockError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (modes, blocks, states, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the decomposition pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FockError {
    /// An index or basis state lies outside the space it was looked up in.
    #[error("range error: {0}")]
    Range(ErrorInfo),
    /// The quantum numbers do not resolve the block structure of an operator.
    #[error("block structure error: {0}")]
    Block(ErrorInfo),
    /// The dense eigensolver rejected or failed on a block matrix.
    #[error("diagonalization error: {0}")]
    Diagonalization(ErrorInfo),
    /// Malformed operator expressions or mode bookkeeping.
    #[error("operator error: {0}")]
    Operator(ErrorInfo),
    /// Invalid options or model descriptions.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FockError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FockError::Range(info)
            | FockError::Block(info)
            | FockError::Diagonalization(info)
            | FockError::Operator(info)
            | FockError::Config(info)
            | FockError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Builds a [`FockError::Range`] for an index that exceeds `dimension`.
    pub fn index_out_of_range(what: &str, value: u64, dimension: usize) -> Self {
        FockError::Range(
            ErrorInfo::new(
                format!("{what}-out-of-range"),
                format!("{what} {value} exceeds the space dimension {dimension}"),
            )
            .with_context(what, value)
            .with_context("dimension", dimension),
        )
    }

    /// Builds a [`FockError::Block`] with the provided code and message.
    pub fn block(code: &str, message: impl Into<String>) -> Self {
        FockError::Block(ErrorInfo::new(code, message))
    }

    /// Builds a [`FockError::Operator`] with the provided code and message.
    pub fn operator(code: &str, message: impl Into<String>) -> Self {
        FockError::Operator(ErrorInfo::new(code, message))
    }

    /// Builds a [`FockError::Config`] with the provided code and message.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        FockError::Config(ErrorInfo::new(code, message))
    }

    /// Builds a [`FockError::Serde`] from any displayable cause.
    pub fn serde(code: &str, err: impl ToString) -> Self {
        FockError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
