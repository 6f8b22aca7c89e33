//! Transaction lifecycle: build, prepare, sign, submit, confirm, simulate

mod builder;
mod fee;
mod operation;
mod poller;
mod sender;
mod signer;
mod simulator;
mod transaction;

pub use builder::{
    TransactionBuilder, TransactionOptions, DEFAULT_TIMEOUT, MAX_OPERATIONS, TESTNET_PASSPHRASE,
};
pub use fee::{Fee, BASE_FEE};
pub use operation::Operation;
pub use poller::{ConfirmationPoller, PollPolicy, TransactionOutcome};
pub use sender::{SubmissionHandle, TransactionSender};
pub use signer::{Ed25519Signer, TransactionSigner};
pub use simulator::Simulator;
pub use transaction::{
    DecoratedSignature, PreparedTransaction, ResourceData, TimeBounds, UnsignedTransaction,
};
