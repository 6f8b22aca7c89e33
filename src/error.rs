//! Error types for the transaction lifecycle

use crate::chain::ClientError;
use crate::types::TxHash;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for build, submit, confirm and simulate operations
#[derive(Error, Debug)]
pub enum TxError {
    #[error("Transaction preparation rejected: {0}")]
    Preparation(#[source] ClientError),

    #[error("Transaction submission rejected: {message}")]
    Submission { message: String, retryable: bool },

    #[error("Transaction {hash} may have been submitted: {source}")]
    SubmissionUnconfirmed {
        hash: TxHash,
        #[source]
        source: ClientError,
    },

    #[error("Transaction {hash} failed: {result}")]
    TransactionFailed { hash: TxHash, result: String },

    #[error("Transaction {hash} succeeded without a return value")]
    MissingReturnValue { hash: TxHash },

    #[error("Transaction {hash} reported unknown status {status:?}")]
    UnknownStatus { hash: TxHash, status: String },

    #[error("Error polling transaction {hash}: {source}")]
    Polling {
        hash: TxHash,
        #[source]
        source: ClientError,
    },

    #[error("Transaction {hash} not confirmed after {attempts} attempts")]
    ConfirmationTimeout { hash: TxHash, attempts: u32 },

    #[error("Failed to simulate transaction: {message}")]
    Simulation { message: String },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Network error during {operation}: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("Unexpected return value from {operation}: {found}")]
    UnexpectedReturn {
        operation: &'static str,
        found: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What an error says about the ledger state of the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The transaction never reached the ledger
    NotSubmitted,
    /// The ledger recorded a final result for the transaction
    Failed,
    /// The transaction may or may not have been applied; re-check the ledger
    Indeterminate,
}

impl TxError {
    /// Classify the ledger state implied by this error
    pub fn disposition(&self) -> Disposition {
        match self {
            TxError::TransactionFailed { .. }
            | TxError::MissingReturnValue { .. }
            | TxError::UnexpectedReturn { .. } => Disposition::Failed,
            TxError::SubmissionUnconfirmed { .. }
            | TxError::UnknownStatus { .. }
            | TxError::Polling { .. }
            | TxError::ConfirmationTimeout { .. } => Disposition::Indeterminate,
            _ => Disposition::NotSubmitted,
        }
    }

    /// Check if a fresh submission (new sequence number) is safe to attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            TxError::Submission { retryable, .. } => *retryable,
            TxError::Network { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Hash of the submitted transaction, when the error happened after submission
    pub fn hash(&self) -> Option<&TxHash> {
        match self {
            TxError::SubmissionUnconfirmed { hash, .. }
            | TxError::TransactionFailed { hash, .. }
            | TxError::MissingReturnValue { hash }
            | TxError::UnknownStatus { hash, .. }
            | TxError::Polling { hash, .. }
            | TxError::ConfirmationTimeout { hash, .. } => Some(hash),
            _ => None,
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            TxError::Preparation(_) => "preparation",
            TxError::Submission { .. } => "submission",
            TxError::SubmissionUnconfirmed { .. } => "submission_unconfirmed",
            TxError::TransactionFailed { .. } => "failed",
            TxError::MissingReturnValue { .. } => "missing_return_value",
            TxError::UnknownStatus { .. } => "unknown_status",
            TxError::Polling { .. } => "polling",
            TxError::ConfirmationTimeout { .. } => "timeout",
            TxError::Simulation { .. } => "simulation",
            TxError::InvalidTransaction(_) => "invalid",
            TxError::Signing(_) => "signing",
            TxError::Network { .. } => "network",
            TxError::UnexpectedReturn { .. } => "unexpected_return",
            TxError::Config(_) => "config",
            TxError::Io { .. } => "io",
        }
    }
}

impl From<anyhow::Error> for TxError {
    fn from(err: anyhow::Error) -> Self {
        TxError::Config(format!("{:#}", err))
    }
}

/// Result type for transaction lifecycle operations
pub type TxResult<T> = Result<T, TxError>;
