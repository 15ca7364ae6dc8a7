//! Transaction submission with a manual-abort grace window
//!
//! The sender announces the pending submission, waits out the grace window so
//! an operator can still abort the process, then broadcasts exactly once.
//! There is no retry: a failed send is returned with the signed transaction.

use super::transaction::Transaction;
use crate::chain::{Broadcaster, TxHash};
use crate::error::{RegistrarError, RegistrarResult};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Suspension used for the grace window
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real wall-clock delay
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}

/// Single-shot transaction sender
pub struct TransactionSender {
    broadcaster: Arc<dyn Broadcaster>,
    delay: Arc<dyn Delay>,
    grace_period: Duration,
}

impl TransactionSender {
    /// Create a new transaction sender
    pub fn new(broadcaster: Arc<dyn Broadcaster>, delay: Arc<dyn Delay>, grace_period: Duration) -> Self {
        Self {
            broadcaster,
            delay,
            grace_period,
        }
    }

    /// Wait out the grace window and broadcast `tx`
    ///
    /// `entries` is only used for the announcement log line.
    pub async fn submit(&self, tx: &Transaction, entries: usize) -> RegistrarResult<TxHash> {
        if !tx.is_signed() {
            return Err(RegistrarError::Signing(
                "Refusing to submit an unsigned transaction".to_string(),
            ));
        }

        info!(
            "registering {} snapshot entries in {}s in smart contract {} ...",
            entries,
            self.grace_period.as_secs(),
            tx.receiver()
        );
        self.delay.wait(self.grace_period).await;

        match self.broadcaster.broadcast(tx).await {
            Ok(tx_hash) => Ok(tx_hash),
            Err(e) => {
                error!("Failed to send transaction with nonce {}: {}", tx.nonce(), e);
                Err(RegistrarError::Submission {
                    message: e.to_string(),
                    transaction: Box::new(tx.clone()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Address, MockBroadcaster, NetworkConfig};
    use crate::error::PipelineStage;
    use crate::tx::payload::ContractCallPayloadBuilder;
    use crate::tx::{Account, UserSigner};
    use std::sync::Mutex;

    /// Records requested waits instead of sleeping
    #[derive(Default)]
    struct RecordingDelay {
        waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn wait(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    fn signed_tx() -> Transaction {
        let signer = UserSigner::from_secret_key(&[5u8; 32]).unwrap();
        let account = Account::new(signer.address(), 3);
        let network = NetworkConfig {
            chain_id: "T".to_string(),
            gas_per_data_byte: 1_500,
            min_gas_price: 1_000_000_000,
        };
        let payload = ContractCallPayloadBuilder::new("registerMembersSnapshot").build();
        let mut tx = Transaction::new_contract_call(
            &account,
            &network,
            Address::from_pubkey([1; 32]),
            &payload,
            50_000_000,
            1_000_000_000,
        );
        signer.sign(&mut tx).unwrap();
        tx
    }

    #[tokio::test]
    async fn test_waits_grace_period_then_broadcasts_once() {
        let mut broadcaster = MockBroadcaster::new();
        broadcaster
            .expect_broadcast()
            .times(1)
            .returning(|_| Ok("abc123".to_string()));
        let delay = Arc::new(RecordingDelay::default());
        let sender = TransactionSender::new(Arc::new(broadcaster), delay.clone(), Duration::from_secs(10));

        let hash = sender.submit(&signed_tx(), 2).await.unwrap();

        assert_eq!(hash, "abc123");
        assert_eq!(*delay.waits.lock().unwrap(), vec![Duration::from_secs(10)]);
    }

    #[tokio::test]
    async fn test_failure_keeps_signed_transaction() {
        let mut broadcaster = MockBroadcaster::new();
        broadcaster.expect_broadcast().times(1).returning(|_| {
            Err(RegistrarError::Network {
                stage: PipelineStage::Submitted,
                message: "lowerNonceInTx".to_string(),
            })
        });
        let sender = TransactionSender::new(Arc::new(broadcaster), Arc::new(NoDelay), Duration::ZERO);
        let tx = signed_tx();

        let err = sender.submit(&tx, 1).await.unwrap_err();

        assert_eq!(err.stage(), PipelineStage::Submitted);
        let kept = err.signed_transaction().unwrap();
        assert_eq!(kept, &tx);
        assert!(kept.is_signed());
        assert!(err.to_string().contains("lowerNonceInTx"));
    }

    #[tokio::test]
    async fn test_unsigned_transaction_is_never_broadcast() {
        let mut broadcaster = MockBroadcaster::new();
        broadcaster.expect_broadcast().never();
        let delay = Arc::new(RecordingDelay::default());
        let sender = TransactionSender::new(Arc::new(broadcaster), delay.clone(), Duration::from_secs(10));

        let account = Account::new(Address::from_pubkey([2; 32]), 0);
        let network = NetworkConfig {
            chain_id: "T".to_string(),
            gas_per_data_byte: 1_500,
            min_gas_price: 1_000_000_000,
        };
        let payload = ContractCallPayloadBuilder::new("f").build();
        let tx = Transaction::new_contract_call(&account, &network, Address::from_pubkey([1; 32]), &payload, 1, 1);

        assert!(matches!(sender.submit(&tx, 0).await, Err(RegistrarError::Signing(_))));
        assert!(delay.waits.lock().unwrap().is_empty());
    }
}
