//! Contract client - deploy, invoke, simulate and read events
//!
//! Composes the transaction sender, poller and simulator around one signing
//! account. Calls are sequential; share one client per account and await each
//! call before issuing the next so sequence numbers are consumed in order.

use crate::chain::NetworkClient;
use crate::config::{EventsConfig, Settings};
use crate::error::{TxError, TxResult};
use crate::events::{ContractEvent, EventQuery};
use crate::tx::{
    ConfirmationPoller, Operation, PollPolicy, Simulator, TransactionOptions, TransactionOutcome,
    Ed25519Signer, TransactionSender, TransactionSigner,
};
use crate::types::{ContractId, ScValue, TxHash};

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of installing contract bytecode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedWasm {
    pub wasm_hash: [u8; 32],
    /// Hash of the upload transaction
    pub tx_hash: TxHash,
}

/// High-level client bound to one signing account
pub struct ContractClient {
    client: Arc<dyn NetworkClient>,
    signer: Arc<dyn TransactionSigner>,
    sender: TransactionSender,
    simulator: Simulator,
    events: EventsConfig,
}

impl ContractClient {
    /// Create a client from loaded settings
    pub fn new(
        client: Arc<dyn NetworkClient>,
        signer: Arc<dyn TransactionSigner>,
        settings: &Settings,
    ) -> TxResult<Self> {
        let options = TransactionOptions::from_config(&settings.network, &settings.transaction)?;
        let policy = PollPolicy::from(&settings.poller);
        Ok(Self::from_parts(
            client,
            signer,
            options,
            policy,
            settings.events.clone(),
        ))
    }

    /// Create a client whose signer is loaded from `settings.signer`
    pub fn from_settings(client: Arc<dyn NetworkClient>, settings: &Settings) -> TxResult<Self> {
        let signer = Arc::new(Ed25519Signer::from_config(&settings.signer)?);
        Self::new(client, signer, settings)
    }

    pub fn from_parts(
        client: Arc<dyn NetworkClient>,
        signer: Arc<dyn TransactionSigner>,
        options: TransactionOptions,
        policy: PollPolicy,
        events: EventsConfig,
    ) -> Self {
        let poller = ConfirmationPoller::new(client.clone(), policy);
        let sender = TransactionSender::new(client.clone(), options.clone(), poller);
        let simulator = Simulator::new(client.clone(), options);

        info!("Contract client initialized for account {}", signer.address());

        Self {
            client,
            signer,
            sender,
            simulator,
            events,
        }
    }

    pub fn address(&self) -> &str {
        self.signer.address()
    }

    pub fn sender(&self) -> &TransactionSender {
        &self.sender
    }

    /// Invoke a contract function and wait for its confirmed result
    pub async fn invoke(
        &self,
        contract_id: &ContractId,
        function: &str,
        args: Vec<ScValue>,
    ) -> TxResult<TransactionOutcome> {
        debug!(contract = %contract_id, function, "Invoking contract");
        let op = Operation::invoke(contract_id.clone(), function, args);
        self.sender.send_and_confirm(vec![op], self.signer.as_ref()).await
    }

    /// Evaluate a contract function without submitting
    pub async fn simulate(
        &self,
        contract_id: &ContractId,
        function: &str,
        args: Vec<ScValue>,
    ) -> TxResult<ScValue> {
        let account = self.sender.fetch_account(self.signer.address()).await?;
        self.simulator
            .simulate(&account, contract_id, function, args)
            .await
    }

    /// Install contract bytecode; returns the hash used to instantiate it
    pub async fn upload_wasm(&self, wasm: Vec<u8>) -> TxResult<UploadedWasm> {
        if wasm.is_empty() {
            return Err(TxError::InvalidTransaction(
                "contract bytecode is empty".to_string(),
            ));
        }

        let outcome = self
            .sender
            .send_and_confirm(vec![Operation::upload_wasm(wasm)], self.signer.as_ref())
            .await?;

        let wasm_hash: [u8; 32] = outcome
            .return_value
            .as_bytes()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| TxError::UnexpectedReturn {
                operation: "upload_wasm",
                found: outcome.return_value.to_string(),
            })?;

        info!(tx_hash = %outcome.hash, wasm_hash = %hex::encode(wasm_hash), "Uploaded wasm");
        Ok(UploadedWasm {
            wasm_hash,
            tx_hash: outcome.hash,
        })
    }

    /// Read bytecode from disk and install it
    pub async fn upload_wasm_file(&self, path: &Path) -> TxResult<UploadedWasm> {
        let wasm = tokio::fs::read(path).await.map_err(|source| TxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = ?path, bytes = wasm.len(), "Read contract bytecode");
        self.upload_wasm(wasm).await
    }

    /// Instantiate a contract from uploaded bytecode, salted with the upload hash
    pub async fn deploy_contract(&self, uploaded: &UploadedWasm) -> TxResult<ContractId> {
        let salt = uploaded.tx_hash.to_bytes().ok_or_else(|| {
            TxError::InvalidTransaction(format!(
                "upload hash {} is not a 32-byte hex hash",
                uploaded.tx_hash
            ))
        })?;

        let op = Operation::create_contract(uploaded.wasm_hash, self.signer.address(), salt);
        let outcome = self
            .sender
            .send_and_confirm(vec![op], self.signer.as_ref())
            .await?;

        let contract_id = outcome
            .return_value
            .as_address()
            .map(ContractId::new)
            .ok_or_else(|| TxError::UnexpectedReturn {
                operation: "deploy_contract",
                found: outcome.return_value.to_string(),
            })?;

        info!(contract = %contract_id, "Deployed contract");
        Ok(contract_id)
    }

    /// Upload bytecode from disk and instantiate it
    pub async fn deploy_wasm_file(&self, path: &Path) -> TxResult<ContractId> {
        let uploaded = self.upload_wasm_file(path).await?;
        self.deploy_contract(&uploaded).await
    }

    /// Events emitted by `contract_ids` over the configured lookback window
    pub async fn recent_events(&self, contract_ids: Vec<ContractId>) -> TxResult<Vec<ContractEvent>> {
        let latest = self
            .client
            .get_latest_ledger()
            .await
            .map_err(|source| TxError::Network {
                operation: "get_latest_ledger",
                source,
            })?;

        let query = EventQuery::from_config(latest, contract_ids, &self.events);
        let events = self
            .client
            .get_events(&query)
            .await
            .map_err(|source| TxError::Network {
                operation: "get_events",
                source,
            })?;

        debug!(
            start_ledger = query.start_ledger,
            count = events.len(),
            "Fetched contract events"
        );
        Ok(events)
    }
}
