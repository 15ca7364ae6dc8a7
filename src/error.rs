//! Error types for the snapshot registrar

use crate::tx::Transaction;
use std::fmt;
use thiserror::Error;

/// Stages of a single registration run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Configured,
    Fetched,
    Encoded,
    Priced,
    Built,
    Signed,
    Submitted,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Configured => "configured",
            PipelineStage::Fetched => "fetched",
            PipelineStage::Encoded => "encoded",
            PipelineStage::Priced => "priced",
            PipelineStage::Built => "built",
            PipelineStage::Signed => "signed",
            PipelineStage::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// Main error type for the registrar
#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid amount '{amount}' for holder {address}")]
    InvalidAmount { address: String, amount: String },

    #[error("No snapshot candidates to register")]
    NoCandidates,

    #[error("Network error at stage {stage}: {message}")]
    Network {
        stage: PipelineStage,
        message: String,
    },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Submission of tx with nonce {} failed: {message}", .transaction.nonce())]
    Submission {
        message: String,
        transaction: Box<Transaction>,
    },
}

impl RegistrarError {
    /// Stage the run was in when this error halted it
    pub fn stage(&self) -> PipelineStage {
        match self {
            RegistrarError::Config(_) => PipelineStage::Configured,
            RegistrarError::NoCandidates => PipelineStage::Fetched,
            RegistrarError::Network { stage, .. } => *stage,
            RegistrarError::InvalidAddress { .. } | RegistrarError::InvalidAmount { .. } => {
                PipelineStage::Encoded
            }
            RegistrarError::Signing(_) => PipelineStage::Signed,
            RegistrarError::Submission { .. } => PipelineStage::Submitted,
        }
    }

    /// The signed transaction, when the failure happened after signing
    pub fn signed_transaction(&self) -> Option<&Transaction> {
        match self {
            RegistrarError::Submission { transaction, .. } => Some(transaction),
            _ => None,
        }
    }

    pub(crate) fn network(stage: PipelineStage, err: impl fmt::Display) -> Self {
        RegistrarError::Network {
            stage,
            message: err.to_string(),
        }
    }
}

/// Result type for registrar operations
pub type RegistrarResult<T> = Result<T, RegistrarError>;
