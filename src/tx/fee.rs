//! Inclusion fee handling

use crate::error::{TxError, TxResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum inclusion fee per operation accepted by the network
pub const BASE_FEE: u32 = 100;

/// Inclusion fee bid for a transaction, in the ledger's smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fee(u32);

impl Fee {
    /// Create a fee, rejecting bids below the network minimum
    pub fn new(amount: u32) -> TxResult<Self> {
        if amount < BASE_FEE {
            return Err(TxError::InvalidTransaction(format!(
                "fee {} is below the minimum of {}",
                amount, BASE_FEE
            )));
        }
        Ok(Self(amount))
    }

    pub fn base() -> Self {
        Self(BASE_FEE)
    }

    pub fn amount(&self) -> u32 {
        self.0
    }

    /// Total fee for a prepared transaction, inclusion plus resource fee
    pub fn with_resource_fee(&self, resource_fee: u64) -> u64 {
        u64::from(self.0).saturating_add(resource_fee)
    }
}

impl Default for Fee {
    fn default() -> Self {
        Self::base()
    }
}

impl FromStr for Fee {
    type Err = TxError;

    fn from_str(s: &str) -> TxResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TxError::InvalidTransaction(format!(
                "fee must be a non-negative integer string, got {:?}",
                s
            )));
        }
        let amount: u32 = trimmed
            .parse()
            .map_err(|e| TxError::InvalidTransaction(format!("fee {:?} out of range: {}", s, e)))?;
        Self::new(amount)
    }
}

impl TryFrom<String> for Fee {
    type Error = TxError;

    fn try_from(s: String) -> TxResult<Self> {
        s.parse()
    }
}

impl From<Fee> for String {
    fn from(fee: Fee) -> Self {
        fee.0.to_string()
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
