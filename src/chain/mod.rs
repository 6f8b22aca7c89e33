//! Chain module - the network capability the lifecycle runs against
//!
//! This module provides:
//! - The `NetworkClient` trait implemented by RPC transports
//! - Response types for submission, status polling and simulation
//!
//! The crate ships no transport. Implementations own the wire format and the
//! account sequence counter on the ledger side.

mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use types::{
    ClientError, GetTransactionResponse, SendStatus, SendTransactionResponse,
    SimulateTransactionResponse, SimulationResult, TransactionStatus,
};

use crate::events::{ContractEvent, EventQuery};
use crate::tx::{PreparedTransaction, UnsignedTransaction};
use crate::types::{AccountReference, TxHash};

use async_trait::async_trait;

/// Ledger RPC capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Fetch an account and its current sequence number
    async fn get_account(&self, address: &str) -> Result<AccountReference, ClientError>;

    /// Estimate resources and footprint for a transaction
    async fn prepare_transaction(
        &self,
        tx: &UnsignedTransaction,
    ) -> Result<PreparedTransaction, ClientError>;

    /// Submit a signed transaction
    async fn send_transaction(
        &self,
        tx: &PreparedTransaction,
    ) -> Result<SendTransactionResponse, ClientError>;

    /// Look up the status of a submitted transaction
    async fn get_transaction(&self, hash: &TxHash) -> Result<GetTransactionResponse, ClientError>;

    /// Dry-run a transaction without submitting it
    async fn simulate_transaction(
        &self,
        tx: &UnsignedTransaction,
    ) -> Result<SimulateTransactionResponse, ClientError>;

    /// Sequence number of the most recently closed ledger
    async fn get_latest_ledger(&self) -> Result<u32, ClientError>;

    /// Query contract events
    async fn get_events(&self, query: &EventQuery) -> Result<Vec<ContractEvent>, ClientError>;
}
