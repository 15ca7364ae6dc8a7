//! ESDT snapshot registrar
//!
//! Snapshots the holders of a fungible token and registers their balances in a
//! smart contract with a single signed contract-call transaction.
//!
//! The pipeline runs once per invocation:
//! holders -> payload -> gas limit -> transaction -> signature -> broadcast.

pub mod chain;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod tx;

pub use error::{PipelineStage, RegistrarError, RegistrarResult};
pub use snapshot::{Registration, SnapshotRegistrar};
