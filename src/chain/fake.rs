//! Scripted in-memory network client for tests

use super::{
    ClientError, GetTransactionResponse, NetworkClient, SendStatus, SendTransactionResponse,
    SimulateTransactionResponse,
};
use crate::events::{ContractEvent, EventQuery};
use crate::tx::{PreparedTransaction, ResourceData, UnsignedTransaction};
use crate::types::{AccountReference, TxHash};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Enforces sequence numbers like a ledger and replays scripted responses.
/// Status polls with nothing scripted report PENDING.
pub(crate) struct FakeNetwork {
    sequences: Mutex<HashMap<String, u64>>,
    fixed_hash: Option<TxHash>,
    send_status: SendStatus,
    statuses: Mutex<VecDeque<Result<GetTransactionResponse, ClientError>>>,
    simulation: Mutex<Option<Result<SimulateTransactionResponse, ClientError>>>,
    latest_ledger: u32,
    events: Vec<ContractEvent>,
    sent: Mutex<Vec<PreparedTransaction>>,
    simulated: Mutex<Vec<UnsignedTransaction>>,
    event_queries: Mutex<Vec<EventQuery>>,
    polls: AtomicU32,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self {
            sequences: Mutex::new(HashMap::new()),
            fixed_hash: None,
            send_status: SendStatus::Pending,
            statuses: Mutex::new(VecDeque::new()),
            simulation: Mutex::new(None),
            latest_ledger: 1_000,
            events: Vec::new(),
            sent: Mutex::new(Vec::new()),
            simulated: Mutex::new(Vec::new()),
            event_queries: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
        }
    }

    pub fn with_account(self, address: &str, sequence: u64) -> Self {
        self.sequences
            .lock()
            .unwrap()
            .insert(address.to_string(), sequence);
        self
    }

    /// Report this hash for every accepted submission
    pub fn with_fixed_hash(mut self, hash: &str) -> Self {
        self.fixed_hash = Some(TxHash::from(hash));
        self
    }

    pub fn with_send_status(mut self, status: SendStatus) -> Self {
        self.send_status = status;
        self
    }

    pub fn with_latest_ledger(mut self, ledger: u32) -> Self {
        self.latest_ledger = ledger;
        self
    }

    pub fn with_events(mut self, events: Vec<ContractEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn script_statuses(&self, statuses: Vec<Result<GetTransactionResponse, ClientError>>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    pub fn script_simulation(&self, response: Result<SimulateTransactionResponse, ClientError>) {
        *self.simulation.lock().unwrap() = Some(response);
    }

    pub fn sent(&self) -> Vec<PreparedTransaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn simulated(&self) -> Vec<UnsignedTransaction> {
        self.simulated.lock().unwrap().clone()
    }

    pub fn event_queries(&self) -> Vec<EventQuery> {
        self.event_queries.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    fn reject(&self, hash: TxHash, reason: &str) -> SendTransactionResponse {
        SendTransactionResponse {
            hash,
            status: SendStatus::Error,
            error_result: Some(reason.to_string()),
            latest_ledger: self.latest_ledger,
        }
    }
}

#[async_trait]
impl NetworkClient for FakeNetwork {
    async fn get_account(&self, address: &str) -> Result<AccountReference, ClientError> {
        self.sequences
            .lock()
            .unwrap()
            .get(address)
            .map(|seq| AccountReference::new(address, *seq))
            .ok_or_else(|| ClientError::Rpc {
                code: 404,
                message: format!("account {} not found", address),
            })
    }

    async fn prepare_transaction(
        &self,
        tx: &UnsignedTransaction,
    ) -> Result<PreparedTransaction, ClientError> {
        let resources = ResourceData {
            resource_fee: 10_000,
            instructions: 1_000_000,
            read_only: vec![],
            read_write: vec![format!("account:{}", tx.source)],
        };
        Ok(PreparedTransaction::new(tx.clone(), resources))
    }

    async fn send_transaction(
        &self,
        tx: &PreparedTransaction,
    ) -> Result<SendTransactionResponse, ClientError> {
        let hash = self.fixed_hash.clone().unwrap_or_else(|| tx.hash());

        if self.send_status != SendStatus::Pending {
            return Ok(SendTransactionResponse {
                hash,
                status: self.send_status,
                error_result: None,
                latest_ledger: self.latest_ledger,
            });
        }
        if !tx.is_signed() {
            return Ok(self.reject(hash, "txBAD_AUTH"));
        }

        let mut sequences = self.sequences.lock().unwrap();
        let current = match sequences.get_mut(&tx.transaction.source) {
            Some(current) => current,
            None => return Ok(self.reject(hash, "txNO_ACCOUNT")),
        };
        if tx.transaction.sequence != *current + 1 {
            return Ok(self.reject(hash, "txBAD_SEQ"));
        }
        *current += 1;
        drop(sequences);

        self.sent.lock().unwrap().push(tx.clone());
        Ok(SendTransactionResponse {
            hash,
            status: SendStatus::Pending,
            error_result: None,
            latest_ledger: self.latest_ledger,
        })
    }

    async fn get_transaction(&self, _hash: &TxHash) -> Result<GetTransactionResponse, ClientError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GetTransactionResponse::pending()))
    }

    async fn simulate_transaction(
        &self,
        tx: &UnsignedTransaction,
    ) -> Result<SimulateTransactionResponse, ClientError> {
        self.simulated.lock().unwrap().push(tx.clone());
        self.simulation
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ClientError::Malformed("no simulation scripted".to_string())))
    }

    async fn get_latest_ledger(&self) -> Result<u32, ClientError> {
        Ok(self.latest_ledger)
    }

    async fn get_events(&self, query: &EventQuery) -> Result<Vec<ContractEvent>, ClientError> {
        self.event_queries.lock().unwrap().push(query.clone());
        Ok(self
            .events
            .iter()
            .filter(|e| e.ledger >= query.start_ledger && query.matches(&e.contract_id))
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}
