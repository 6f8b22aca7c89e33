//! Identifiers and values shared across the lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signing account as seen by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReference {
    /// Account address (public key)
    pub address: String,
    /// Last sequence number consumed by the ledger
    pub sequence: u64,
}

impl AccountReference {
    pub fn new(address: impl Into<String>, sequence: u64) -> Self {
        Self {
            address: address.into(),
            sequence,
        }
    }

    /// Sequence number the next transaction from this account must carry
    pub fn next_sequence(&self) -> Option<u64> {
        self.sequence.checked_add(1)
    }
}

/// Transaction hash returned by submission, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into raw bytes; `None` unless the hash is 32 bytes of hex
    pub fn to_bytes(&self) -> Option<[u8; 32]> {
        hex::decode(&self.0).ok()?.try_into().ok()
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of a deployed contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded contract value, used for call arguments and return values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScValue {
    Void,
    Bool(bool),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Bytes(Vec<u8>),
    String(String),
    Symbol(String),
    Address(String),
    Vec(Vec<ScValue>),
}

impl ScValue {
    pub fn symbol(s: impl Into<String>) -> Self {
        ScValue::Symbol(s.into())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ScValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            ScValue::Address(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for ScValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScValue::Void => f.write_str("void"),
            ScValue::Bool(v) => write!(f, "{}", v),
            ScValue::U32(v) => write!(f, "{}", v),
            ScValue::I32(v) => write!(f, "{}", v),
            ScValue::U64(v) => write!(f, "{}", v),
            ScValue::I64(v) => write!(f, "{}", v),
            ScValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            ScValue::String(s) => write!(f, "{:?}", s),
            ScValue::Symbol(s) => write!(f, "{}", s),
            ScValue::Address(a) => write!(f, "{}", a),
            ScValue::Vec(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}
