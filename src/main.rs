//! ESDT snapshot registrar CLI
//!
//! Reads the holders of the configured token and registers them in the
//! configured contract for the selected network.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use esdt_snapshot_registrar::chain::{IndexApiProvider, ProxyProvider};
use esdt_snapshot_registrar::config::Settings;
use esdt_snapshot_registrar::tx::{PemFileKeySource, TokioDelay};
use esdt_snapshot_registrar::SnapshotRegistrar;

#[derive(Parser, Debug)]
#[command(name = "esdt-snapshot", version, about = "Register ESDT holder snapshots in a smart contract")]
struct Cli {
    /// Network section of the settings file (e.g. devnet, mainnet)
    network: String,

    /// Settings file, defaults to $SNAPSHOT_CONFIG or config/default.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    let cli = Cli::parse();
    info!("Starting ESDT snapshot registrar v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; nothing touches the network before this succeeds
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load settings")?;
    let network = settings.network(&cli.network)?;
    let contract = network.contract()?;
    let registrar_config = settings.registrar.clone();

    let proxy = Arc::new(ProxyProvider::new(
        network.proxy_url.clone(),
        registrar_config.request_timeout(),
    )?);
    let index = IndexApiProvider::new(
        network.api_url.clone(),
        registrar_config.holders_page_size,
        registrar_config.request_timeout(),
    )?;
    let keys = Arc::new(PemFileKeySource::new(&settings.wallet.pem_path));

    let registrar = SnapshotRegistrar::new(
        registrar_config,
        proxy.clone(),
        proxy.clone(),
        keys,
        proxy,
        Arc::new(TokioDelay),
    );

    match registrar
        .snapshot_and_register(&index, &network.token_id, contract)
        .await
    {
        Ok(registration) => {
            info!(
                "done! snapshot of {} members registered with tx '{}'",
                registration.member_count,
                registration.tx_hash
            );
            Ok(())
        }
        Err(e) => {
            error!("Registration failed at stage {}: {}", e.stage(), e);
            if let Some(tx) = e.signed_transaction() {
                if let Ok(body) = tx.to_send_json() {
                    warn!("Signed transaction kept for manual resubmission: {}", body);
                }
            }
            Err(e.into())
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,esdt_snapshot_registrar=debug,reqwest=warn,hyper=warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
