//! Snapshot registration pipeline
//!
//! One pass, no loops: `Fetched -> Encoded -> Priced -> Built -> Signed ->
//! Submitted`. Any failure halts the run; since all members travel in one
//! payload under one signature, nothing is ever partially registered.

use super::{format_amount, members_from_holders, SnapshotMember, TokenDefinition};
use crate::chain::{AccountSource, Address, Broadcaster, HolderSource, NetworkConfigSource, TxHash};
use crate::config::RegistrarConfig;
use crate::error::{PipelineStage, RegistrarError, RegistrarResult};
use crate::tx::{
    encode_snapshot, Account, Delay, GasEstimator, SigningKeySource, Transaction, TransactionSender,
};

use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a successful registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub tx_hash: TxHash,
    pub member_count: usize,
    /// The transaction exactly as it was broadcast
    pub transaction: Transaction,
    /// Sender account after the local nonce increment
    pub account: Account,
}

/// Registers holder snapshots in a contract
///
/// Every external dependency is injected so runs can be driven against fakes.
/// Only one registration per sender account may be in flight at a time.
pub struct SnapshotRegistrar {
    config: RegistrarConfig,
    accounts: Arc<dyn AccountSource>,
    network: Arc<dyn NetworkConfigSource>,
    keys: Arc<dyn SigningKeySource>,
    gas_estimator: GasEstimator,
    sender: TransactionSender,
}

impl SnapshotRegistrar {
    pub fn new(
        config: RegistrarConfig,
        accounts: Arc<dyn AccountSource>,
        network: Arc<dyn NetworkConfigSource>,
        keys: Arc<dyn SigningKeySource>,
        broadcaster: Arc<dyn Broadcaster>,
        delay: Arc<dyn Delay>,
    ) -> Self {
        let sender = TransactionSender::new(broadcaster, delay, config.grace_period());
        Self {
            gas_estimator: GasEstimator::from_config(&config),
            config,
            accounts,
            network,
            keys,
            sender,
        }
    }

    /// Fetch the current holders of `token_id` and register them in `receiver`
    pub async fn snapshot_and_register(
        &self,
        holders: &dyn HolderSource,
        token_id: &str,
        receiver: Address,
    ) -> RegistrarResult<Registration> {
        let token = holders.fetch_token_definition(token_id).await?;
        let candidates = holders.fetch_holders(token_id).await?;

        info!("found {} candidates ...", candidates.len());

        let members = members_from_holders(&candidates)?;
        self.register_snapshot(receiver, &token, &members).await
    }

    /// Encode, price, build, sign and submit one registration transaction
    pub async fn register_snapshot(
        &self,
        receiver: Address,
        token: &TokenDefinition,
        members: &[SnapshotMember],
    ) -> RegistrarResult<Registration> {
        if members.is_empty() {
            return Err(RegistrarError::NoCandidates);
        }

        let signer = self.keys.load_signer()?;
        let mut account = self.accounts.fetch_account(&signer.address()).await?;
        let network = self.network.fetch_network_config().await?;
        debug!(
            "Stage {}: nonce {}, chain {}",
            PipelineStage::Fetched,
            account.nonce(),
            network.chain_id
        );

        for member in members {
            info!(
                "ADDRESS: {} | AMOUNT: {}",
                member.address,
                format_amount(&member.weight, token.decimals)
            );
        }
        let payload = encode_snapshot(&self.config.function, members)?;
        debug!("Stage {}: {} payload bytes", PipelineStage::Encoded, payload.len());

        let gas_limit = self.gas_estimator.estimate(&network, payload.len());
        let gas_price = self.config.gas_price.max(network.min_gas_price);
        debug!(
            "Stage {}: gas limit {}, gas price {}",
            PipelineStage::Priced,
            gas_limit,
            gas_price
        );

        let mut tx =
            Transaction::new_contract_call(&account, &network, receiver, &payload, gas_limit, gas_price);
        debug!("Stage {}: nonce {}", PipelineStage::Built, tx.nonce());

        signer.sign(&mut tx)?;
        drop(signer);
        account.increment_nonce();
        debug!("Stage {}", PipelineStage::Signed);

        let tx_hash = self.sender.submit(&tx, members.len()).await?;
        info!("Stage {}: {}", PipelineStage::Submitted, tx_hash);

        Ok(Registration {
            tx_hash,
            member_count: members.len(),
            transaction: tx,
            account,
        })
    }
}
