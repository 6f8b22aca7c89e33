//! Contract event queries
//!
//! Events are read back from the ledger by start ledger and contract id.

use crate::config::EventsConfig;
use crate::types::{ContractId, ScValue};

use serde::{Deserialize, Serialize};

/// Event emitted by a contract invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Network-assigned event id
    pub id: String,
    pub ledger: u32,
    pub contract_id: ContractId,
    pub topics: Vec<ScValue>,
    pub value: ScValue,
}

impl ContractEvent {
    /// First topic, conventionally the event name symbol
    pub fn name(&self) -> Option<&str> {
        match self.topics.first() {
            Some(ScValue::Symbol(s)) | Some(ScValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Filter for an event query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub start_ledger: u32,
    /// Empty matches every contract
    pub contract_ids: Vec<ContractId>,
    pub limit: u32,
}

impl EventQuery {
    /// Events from the last `lookback` ledgers before `latest_ledger`
    pub fn recent(latest_ledger: u32, lookback: u32, contract_ids: Vec<ContractId>, limit: u32) -> Self {
        Self {
            start_ledger: latest_ledger.saturating_sub(lookback).max(1),
            contract_ids,
            limit,
        }
    }

    pub fn from_config(latest_ledger: u32, contract_ids: Vec<ContractId>, config: &EventsConfig) -> Self {
        Self::recent(latest_ledger, config.lookback, contract_ids, config.limit)
    }

    pub fn matches(&self, contract_id: &ContractId) -> bool {
        self.contract_ids.is_empty() || self.contract_ids.contains(contract_id)
    }
}
