//! Request and response shapes exchanged with the network client

use crate::types::{ScValue, TxHash};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure reported by a network client implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Request timed out")]
    Timeout,
}

impl ClientError {
    /// Transport-level failures that may succeed when repeated
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Timeout)
    }
}

/// Status returned by the network when accepting a signed envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionResponse {
    pub hash: TxHash,
    pub status: SendStatus,
    /// Rejection reason, set when `status` is `Error`
    #[serde(default)]
    pub error_result: Option<String>,
    pub latest_ledger: u32,
}

/// Ledger status of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Unknown(String),
}

impl From<&str> for TransactionStatus {
    fn from(s: &str) -> Self {
        match s {
            // NOT_FOUND means the ledger has not ingested the hash yet
            "PENDING" | "NOT_FOUND" => TransactionStatus::Pending,
            "SUCCESS" => TransactionStatus::Success,
            "FAILED" => TransactionStatus::Failed,
            other => TransactionStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        TransactionStatus::from(s.as_str())
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => f.write_str("PENDING"),
            TransactionStatus::Success => f.write_str("SUCCESS"),
            TransactionStatus::Failed => f.write_str("FAILED"),
            TransactionStatus::Unknown(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionResponse {
    pub status: TransactionStatus,
    /// Ledger the transaction was applied in
    #[serde(default)]
    pub ledger: Option<u32>,
    #[serde(default)]
    pub return_value: Option<ScValue>,
    /// Result code for failed transactions
    #[serde(default)]
    pub result: Option<String>,
}

impl GetTransactionResponse {
    pub fn pending() -> Self {
        Self {
            status: TransactionStatus::Pending,
            ledger: None,
            return_value: None,
            result: None,
        }
    }

    pub fn success(ledger: u32, return_value: Option<ScValue>) -> Self {
        Self {
            status: TransactionStatus::Success,
            ledger: Some(ledger),
            return_value,
            result: None,
        }
    }

    pub fn failed(ledger: u32, result: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Failed,
            ledger: Some(ledger),
            return_value: None,
            result: Some(result.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub retval: ScValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateTransactionResponse {
    #[serde(default)]
    pub result: Option<SimulationResult>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub min_resource_fee: Option<u64>,
    pub latest_ledger: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(TransactionStatus::from("NOT_FOUND"), TransactionStatus::Pending);
        assert_eq!(TransactionStatus::from("SUCCESS"), TransactionStatus::Success);
        assert_eq!(
            TransactionStatus::from("REVOKED"),
            TransactionStatus::Unknown("REVOKED".to_string())
        );
    }

    #[test]
    fn test_get_transaction_response_from_json() {
        let json = r#"{
            "status": "SUCCESS",
            "ledger": 1200,
            "return_value": {"type": "u32", "value": 7}
        }"#;
        let response: GetTransactionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, TransactionStatus::Success);
        assert_eq!(response.return_value, Some(ScValue::U32(7)));
        assert!(response.result.is_none());
    }

    #[test]
    fn test_send_status_names() {
        let status: SendStatus = serde_json::from_str("\"TRY_AGAIN_LATER\"").unwrap();
        assert_eq!(status, SendStatus::TryAgainLater);
    }
}
