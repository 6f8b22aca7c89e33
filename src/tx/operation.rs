//! Ledger operations carried by a transaction

use crate::types::{ContractId, ScValue};

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// A single unit of ledger mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Install contract bytecode on the ledger
    UploadContractWasm { wasm: Vec<u8> },

    /// Instantiate a contract from previously uploaded bytecode
    CreateContract {
        wasm_hash: [u8; 32],
        deployer: String,
        salt: [u8; 32],
    },

    /// Call a contract function
    InvokeContract {
        contract_id: ContractId,
        function: String,
        args: Vec<ScValue>,
    },
}

impl Operation {
    pub fn upload_wasm(wasm: impl Into<Vec<u8>>) -> Self {
        Operation::UploadContractWasm { wasm: wasm.into() }
    }

    pub fn create_contract(wasm_hash: [u8; 32], deployer: impl Into<String>, salt: [u8; 32]) -> Self {
        Operation::CreateContract {
            wasm_hash,
            deployer: deployer.into(),
            salt,
        }
    }

    pub fn invoke(contract_id: ContractId, function: impl Into<String>, args: Vec<ScValue>) -> Self {
        Operation::InvokeContract {
            contract_id,
            function: function.into(),
            args,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::UploadContractWasm { .. } => "upload_contract_wasm",
            Operation::CreateContract { .. } => "create_contract",
            Operation::InvokeContract { .. } => "invoke_contract",
        }
    }

    /// Feed the canonical encoding of this operation into a hasher
    pub(crate) fn digest_into(&self, hasher: &mut Keccak256) {
        match self {
            Operation::UploadContractWasm { wasm } => {
                hasher.update([0u8]);
                write_bytes(hasher, wasm);
            }
            Operation::CreateContract {
                wasm_hash,
                deployer,
                salt,
            } => {
                hasher.update([1u8]);
                hasher.update(wasm_hash);
                write_bytes(hasher, deployer.as_bytes());
                hasher.update(salt);
            }
            Operation::InvokeContract {
                contract_id,
                function,
                args,
            } => {
                hasher.update([2u8]);
                write_bytes(hasher, contract_id.as_str().as_bytes());
                write_bytes(hasher, function.as_bytes());
                hasher.update((args.len() as u64).to_be_bytes());
                for arg in args {
                    digest_value(hasher, arg);
                }
            }
        }
    }
}

/// Length-prefixed byte string
pub(crate) fn write_bytes(hasher: &mut Keccak256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

fn digest_value(hasher: &mut Keccak256, value: &ScValue) {
    match value {
        ScValue::Void => hasher.update([0u8]),
        ScValue::Bool(v) => hasher.update([1u8, *v as u8]),
        ScValue::U32(v) => {
            hasher.update([2u8]);
            hasher.update(v.to_be_bytes());
        }
        ScValue::I32(v) => {
            hasher.update([3u8]);
            hasher.update(v.to_be_bytes());
        }
        ScValue::U64(v) => {
            hasher.update([4u8]);
            hasher.update(v.to_be_bytes());
        }
        ScValue::I64(v) => {
            hasher.update([5u8]);
            hasher.update(v.to_be_bytes());
        }
        ScValue::Bytes(b) => {
            hasher.update([6u8]);
            write_bytes(hasher, b);
        }
        ScValue::String(s) => {
            hasher.update([7u8]);
            write_bytes(hasher, s.as_bytes());
        }
        ScValue::Symbol(s) => {
            hasher.update([8u8]);
            write_bytes(hasher, s.as_bytes());
        }
        ScValue::Address(a) => {
            hasher.update([9u8]);
            write_bytes(hasher, a.as_bytes());
        }
        ScValue::Vec(items) => {
            hasher.update([10u8]);
            hasher.update((items.len() as u64).to_be_bytes());
            for item in items {
                digest_value(hasher, item);
            }
        }
    }
}
