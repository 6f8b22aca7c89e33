//! txflow - transaction lifecycle for smart-contract ledgers
//!
//! Builds, prepares, signs and submits transactions over a `NetworkClient`,
//! polls them to a terminal state, and runs read-only simulations. The
//! `ContractClient` layers bytecode upload, contract deployment, invocation
//! and event queries on top.
//!
//! Sequence numbers are consumed once per submitted transaction. Callers that
//! submit concurrently from the same account must serialize those calls.

pub mod chain;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod metrics;
pub mod tx;
pub mod types;

pub use chain::{ClientError, NetworkClient};
pub use client::{ContractClient, UploadedWasm};
pub use config::Settings;
pub use error::{Disposition, TxError, TxResult};
pub use tx::{
    ConfirmationPoller, Ed25519Signer, Operation, PollPolicy, Simulator, SubmissionHandle,
    TransactionBuilder, TransactionOptions, TransactionOutcome, TransactionSender,
    TransactionSigner,
};
pub use types::{AccountReference, ContractId, ScValue, TxHash};
