//! Read-only contract calls through simulation

use super::builder::{TransactionBuilder, TransactionOptions};
use super::operation::Operation;
use crate::chain::NetworkClient;
use crate::error::{TxError, TxResult};
use crate::metrics;
use crate::types::{AccountReference, ContractId, ScValue};

use std::sync::Arc;
use tracing::debug;

/// Dry-runs contract calls; never submits, never mutates the ledger
pub struct Simulator {
    client: Arc<dyn NetworkClient>,
    options: TransactionOptions,
}

impl Simulator {
    pub fn new(client: Arc<dyn NetworkClient>, options: TransactionOptions) -> Self {
        Self { client, options }
    }

    /// Simulate `function` on `contract_id` and return the decoded result
    pub async fn simulate(
        &self,
        source: &AccountReference,
        contract_id: &ContractId,
        function: &str,
        args: Vec<ScValue>,
    ) -> TxResult<ScValue> {
        let tx = TransactionBuilder::new(source, &self.options)
            .add_operation(Operation::invoke(contract_id.clone(), function, args))
            .build()?;

        let response = self
            .client
            .simulate_transaction(&tx)
            .await
            .map_err(|source| TxError::Network {
                operation: "simulate",
                source,
            })?;

        let result = match (response.result, response.error) {
            (Some(result), _) => {
                debug!(
                    contract = %contract_id,
                    function,
                    min_resource_fee = ?response.min_resource_fee,
                    "Simulation returned {}",
                    result.retval
                );
                Ok(result.retval)
            }
            (None, Some(message)) => Err(TxError::Simulation { message }),
            (None, None) => Err(TxError::Simulation {
                message: "no result".to_string(),
            }),
        };

        metrics::record_simulation(result.is_ok());
        result
    }
}
