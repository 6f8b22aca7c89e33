//! Transaction builder

use super::fee::Fee;
use super::operation::Operation;
use super::transaction::{TimeBounds, UnsignedTransaction};
use crate::config::{NetworkConfig, TransactionConfig};
use crate::error::{TxError, TxResult};
use crate::types::AccountReference;

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// Passphrase of the public test network
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Default validity window for a built transaction
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Host-function operations are limited to one per transaction by the network
pub const MAX_OPERATIONS: usize = 1;

/// Parameters applied to every built transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOptions {
    pub fee: Fee,
    pub network_passphrase: String,
    pub timeout: Duration,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            fee: Fee::base(),
            network_passphrase: TESTNET_PASSPHRASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransactionOptions {
    pub fn from_config(network: &NetworkConfig, tx: &TransactionConfig) -> TxResult<Self> {
        Ok(Self {
            fee: tx.fee.parse()?,
            network_passphrase: network.network_passphrase.clone(),
            timeout: Duration::from_secs(tx.timeout_secs),
        })
    }
}

/// Assembles an unsigned transaction from a freshly fetched account
pub struct TransactionBuilder<'a> {
    source: &'a AccountReference,
    options: &'a TransactionOptions,
    operations: Vec<Operation>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(source: &'a AccountReference, options: &'a TransactionOptions) -> Self {
        Self {
            source,
            options,
            operations: Vec::new(),
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Append operations in order
    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn build(self) -> TxResult<UnsignedTransaction> {
        self.build_at(Utc::now())
    }

    /// Build with an explicit clock; identical inputs give identical output
    pub fn build_at(self, now: DateTime<Utc>) -> TxResult<UnsignedTransaction> {
        if self.operations.is_empty() {
            return Err(TxError::InvalidTransaction(
                "transaction has no operations".to_string(),
            ));
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TxError::InvalidTransaction(format!(
                "transaction has {} operations, at most {} allowed",
                self.operations.len(),
                MAX_OPERATIONS
            )));
        }
        if self.options.timeout.is_zero() {
            return Err(TxError::InvalidTransaction(
                "timeout must be positive".to_string(),
            ));
        }

        let sequence = self.source.next_sequence().ok_or_else(|| {
            TxError::InvalidTransaction(format!(
                "sequence number exhausted for account {}",
                self.source.address
            ))
        })?;

        let now_secs = now.timestamp().max(0) as u64;
        let time_bounds = TimeBounds {
            min_time: 0,
            max_time: now_secs.saturating_add(self.options.timeout.as_secs().max(1)),
        };

        debug!(
            source = %self.source.address,
            sequence,
            operation = self.operations[0].name(),
            "Built transaction"
        );

        Ok(UnsignedTransaction {
            source: self.source.address.clone(),
            sequence,
            fee: self.options.fee,
            network_passphrase: self.options.network_passphrase.clone(),
            time_bounds,
            operations: self.operations,
        })
    }
}
