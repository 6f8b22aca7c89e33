//! Transaction envelopes through the lifecycle: unsigned, prepared, signed

use super::fee::Fee;
use super::operation::{write_bytes, Operation};
use super::signer::TransactionSigner;
use crate::error::{TxError, TxResult};
use crate::types::TxHash;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Validity window in unix seconds; zero means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// Transaction ready for preparation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub source: String,
    pub sequence: u64,
    pub fee: Fee,
    pub network_passphrase: String,
    pub time_bounds: TimeBounds,
    pub operations: Vec<Operation>,
}

impl UnsignedTransaction {
    /// Network-scoped hash of the transaction body
    pub fn hash(&self) -> TxHash {
        TxHash::from_bytes(&self.digest(None))
    }

    fn digest(&self, resources: Option<&ResourceData>) -> [u8; 32] {
        let network_id = Keccak256::digest(self.network_passphrase.as_bytes());

        let mut hasher = Keccak256::new();
        hasher.update(network_id);
        write_bytes(&mut hasher, self.source.as_bytes());
        hasher.update(self.sequence.to_be_bytes());
        hasher.update(self.fee.amount().to_be_bytes());
        hasher.update(self.time_bounds.min_time.to_be_bytes());
        hasher.update(self.time_bounds.max_time.to_be_bytes());
        hasher.update((self.operations.len() as u64).to_be_bytes());
        for op in &self.operations {
            op.digest_into(&mut hasher);
        }
        if let Some(resources) = resources {
            hasher.update([1u8]);
            resources.digest_into(&mut hasher);
        } else {
            hasher.update([0u8]);
        }
        hasher.finalize().into()
    }
}

/// Resource estimate attached by the prepare step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Fee charged for declared resources, on top of the inclusion fee
    pub resource_fee: u64,
    pub instructions: u64,
    /// Ledger keys read by the transaction
    #[serde(default)]
    pub read_only: Vec<String>,
    /// Ledger keys written by the transaction
    #[serde(default)]
    pub read_write: Vec<String>,
}

impl ResourceData {
    fn digest_into(&self, hasher: &mut Keccak256) {
        hasher.update(self.resource_fee.to_be_bytes());
        hasher.update(self.instructions.to_be_bytes());
        for keys in [&self.read_only, &self.read_write] {
            hasher.update((keys.len() as u64).to_be_bytes());
            for key in keys {
                write_bytes(hasher, key.as_bytes());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    /// Last four bytes of the signer's public key
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

/// Prepared transaction; signatures are attached in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedTransaction {
    pub transaction: UnsignedTransaction,
    pub resources: ResourceData,
    #[serde(default)]
    pub signatures: Vec<DecoratedSignature>,
}

impl PreparedTransaction {
    pub fn new(transaction: UnsignedTransaction, resources: ResourceData) -> Self {
        Self {
            transaction,
            resources,
            signatures: Vec::new(),
        }
    }

    /// Hash covering the body and the resource estimate; this is what gets signed
    pub fn hash(&self) -> TxHash {
        TxHash::from_bytes(&self.transaction.digest(Some(&self.resources)))
    }

    pub fn total_fee(&self) -> u64 {
        self.transaction
            .fee
            .with_resource_fee(self.resources.resource_fee)
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Sign the transaction hash and attach the signature
    pub fn sign(&mut self, signer: &dyn TransactionSigner) -> TxResult<()> {
        if signer.address() != self.transaction.source {
            return Err(TxError::Signing(format!(
                "signer {} does not match transaction source {}",
                signer.address(),
                self.transaction.source
            )));
        }
        let signature = signer.sign(&self.hash())?;
        self.signatures.push(signature);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractId, ScValue};

    fn sample() -> UnsignedTransaction {
        UnsignedTransaction {
            source: "GSOURCE".to_string(),
            sequence: 6,
            fee: Fee::base(),
            network_passphrase: "Test SDF Network ; September 2015".to_string(),
            time_bounds: TimeBounds {
                min_time: 0,
                max_time: 1_700_000_030,
            },
            operations: vec![Operation::invoke(
                ContractId::new("CCOUNTER"),
                "increment",
                vec![ScValue::U32(1)],
            )],
        }
    }

    #[test]
    fn test_hash_is_network_scoped() {
        let tx = sample();
        let mut other = sample();
        other.network_passphrase = "Public Global Stellar Network ; September 2015".to_string();
        assert_eq!(tx.hash(), sample().hash());
        assert_ne!(tx.hash(), other.hash());
    }

    #[test]
    fn test_prepared_hash_covers_resources() {
        let tx = sample();
        let prepared = PreparedTransaction::new(
            tx.clone(),
            ResourceData {
                resource_fee: 5_000,
                ..Default::default()
            },
        );
        assert_ne!(prepared.hash(), tx.hash());
        assert_eq!(prepared.total_fee(), 5_100);
        assert!(!prepared.is_signed());
    }
}
