//! Transaction module - payload encoding, pricing, building, signing and submission

pub mod gas;
pub mod nonce;
pub mod payload;
pub mod sender;
pub mod signer;
pub mod transaction;

pub use gas::GasEstimator;
pub use nonce::Account;
pub use payload::{encode_snapshot, ContractCallPayload, ContractCallPayloadBuilder};
pub use sender::{Delay, NoDelay, TokioDelay, TransactionSender};
pub use signer::{PemFileKeySource, SigningKeySource, UserSigner};
pub use transaction::Transaction;
