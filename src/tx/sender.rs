//! Transaction sender: prepare, sign, submit, and the confirm pipeline
//!
//! Every step is awaited before the next starts. Each built transaction
//! consumes the account's next sequence number, so callers submitting from
//! one account concurrently must serialize their calls to `send_and_confirm`.

use super::builder::{TransactionBuilder, TransactionOptions};
use super::operation::Operation;
use super::poller::{ConfirmationPoller, TransactionOutcome};
use super::signer::TransactionSigner;
use super::transaction::UnsignedTransaction;
use crate::chain::{NetworkClient, SendStatus};
use crate::error::{TxError, TxResult};
use crate::metrics;
use crate::types::{AccountReference, TxHash};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Proof of submission, used to poll for the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle {
    pub hash: TxHash,
    pub submitted_at: DateTime<Utc>,
    /// The network already knew this transaction
    pub duplicate: bool,
}

/// Submits transactions and waits for their confirmation
pub struct TransactionSender {
    client: Arc<dyn NetworkClient>,
    options: TransactionOptions,
    poller: ConfirmationPoller,
}

impl TransactionSender {
    pub fn new(
        client: Arc<dyn NetworkClient>,
        options: TransactionOptions,
        poller: ConfirmationPoller,
    ) -> Self {
        Self {
            client,
            options,
            poller,
        }
    }

    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }

    /// Fetch the current account state; call right before building
    pub async fn fetch_account(&self, address: &str) -> TxResult<AccountReference> {
        let account = self
            .client
            .get_account(address)
            .await
            .map_err(|source| TxError::Network {
                operation: "get_account",
                source,
            })?;
        debug!(address, sequence = account.sequence, "Fetched account");
        Ok(account)
    }

    /// Build an unsigned transaction with this sender's options
    pub fn build(
        &self,
        account: &AccountReference,
        operations: Vec<Operation>,
    ) -> TxResult<UnsignedTransaction> {
        TransactionBuilder::new(account, &self.options)
            .operations(operations)
            .build()
    }

    /// Prepare, sign and submit a transaction
    pub async fn submit(
        &self,
        tx: UnsignedTransaction,
        signer: &dyn TransactionSigner,
    ) -> TxResult<SubmissionHandle> {
        let mut prepared = self
            .client
            .prepare_transaction(&tx)
            .await
            .map_err(|e| {
                error!(source = %tx.source, sequence = tx.sequence, "Preparation failed: {}", e);
                TxError::Preparation(e)
            })?;
        debug!(
            resource_fee = prepared.resources.resource_fee,
            total_fee = prepared.total_fee(),
            "Transaction prepared"
        );

        prepared.sign(signer)?;
        let hash = prepared.hash();

        // Once the envelope has left, a transport failure says nothing about the ledger
        let response = self
            .client
            .send_transaction(&prepared)
            .await
            .map_err(|source| {
                error!(%hash, "Send failed, ledger state unknown: {}", source);
                TxError::SubmissionUnconfirmed { hash, source }
            })?;

        match response.status {
            SendStatus::Pending | SendStatus::Duplicate => {
                let duplicate = response.status == SendStatus::Duplicate;
                if duplicate {
                    warn!(hash = %response.hash, "Network reports duplicate submission");
                }
                info!(
                    hash = %response.hash,
                    sequence = prepared.transaction.sequence,
                    "Transaction sent"
                );
                metrics::record_tx_submitted();
                Ok(SubmissionHandle {
                    hash: response.hash,
                    submitted_at: Utc::now(),
                    duplicate,
                })
            }
            SendStatus::TryAgainLater => Err(TxError::Submission {
                message: "network asked to try again later".to_string(),
                retryable: true,
            }),
            SendStatus::Error => Err(TxError::Submission {
                message: response
                    .error_result
                    .unwrap_or_else(|| "transaction rejected".to_string()),
                retryable: false,
            }),
        }
    }

    /// Run the whole lifecycle: fetch account, build, submit, poll
    pub async fn send_and_confirm(
        &self,
        operations: Vec<Operation>,
        signer: &dyn TransactionSigner,
    ) -> TxResult<TransactionOutcome> {
        let handle = self
            .prepare_and_submit(operations, signer)
            .await
            .map_err(|e| {
                metrics::record_tx_failed(e.kind());
                e
            })?;
        self.poller.wait_for(&handle).await
    }

    async fn prepare_and_submit(
        &self,
        operations: Vec<Operation>,
        signer: &dyn TransactionSigner,
    ) -> TxResult<SubmissionHandle> {
        let account = self.fetch_account(signer.address()).await?;
        let tx = self.build(&account, operations)?;
        self.submit(tx, signer).await
    }
}
