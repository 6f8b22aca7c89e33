//! Signing capability and the ed25519 implementation

use super::transaction::DecoratedSignature;
use crate::config::SignerConfig;
use crate::error::{TxError, TxResult};
use crate::types::TxHash;

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use tracing::info;

/// Produces signatures over transaction hashes. Never mutates its key.
pub trait TransactionSigner: Send + Sync {
    /// Account address this signer signs for
    fn address(&self) -> &str;

    fn sign(&self, hash: &TxHash) -> TxResult<DecoratedSignature>;
}

/// Local ed25519 key
pub struct Ed25519Signer {
    key: SigningKey,
    address: String,
}

impl Ed25519Signer {
    /// Create a signer from a 32-byte hex encoded seed
    pub fn from_hex_seed(seed: &str) -> TxResult<Self> {
        let bytes = hex::decode(seed.trim())
            .map_err(|e| TxError::Signing(format!("Invalid secret key: {}", e)))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| TxError::Signing(format!("Secret key must be 32 bytes, got {}", b.len())))?;

        let key = SigningKey::from_bytes(&seed);
        let address = hex::encode(key.verifying_key().to_bytes());
        Ok(Self { key, address })
    }

    /// Load the seed from an environment variable
    pub fn from_env(var: &str) -> TxResult<Self> {
        let seed = std::env::var(var).map_err(|_| {
            TxError::Signing(format!("No signer configured. Set {} to a hex seed", var))
        })?;
        let signer = Self::from_hex_seed(&seed)?;
        info!("Signer loaded for account {}", signer.address);
        Ok(signer)
    }

    /// Load the seed from the environment variable named in the config
    pub fn from_config(config: &SignerConfig) -> TxResult<Self> {
        Self::from_env(&config.secret_env)
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

impl TransactionSigner for Ed25519Signer {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, hash: &TxHash) -> TxResult<DecoratedSignature> {
        let public = self.key.verifying_key().to_bytes();
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&public[28..]);

        let digest = hash.to_bytes().ok_or_else(|| {
            TxError::Signing(format!("{} is not a 32-byte transaction hash", hash))
        })?;
        let signature = self.key.sign(&digest);
        Ok(DecoratedSignature {
            hint,
            signature: signature.to_bytes().to_vec(),
        })
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
