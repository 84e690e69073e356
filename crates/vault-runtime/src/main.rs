//! # Key-Vault
//!
//! Entry point for the vault daemon: wallets, slashing-protected signing
//! and the remote signing protocol over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kv_04_wallet_store::Network;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vault_runtime::config::LoggingConfig;
use vault_runtime::{build_app, serve, VaultConfig};

/// Ethereum validator key vault with slashing protection
#[derive(Parser, Debug)]
#[command(name = "vault-runtime", version)]
#[command(about = "Slashing-protected BLS signing service")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "KV_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides http.listen
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Data directory, overrides storage.data_dir
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Bearer token accepted by the API; repeatable
    #[arg(long = "access-token", env = "KV_ACCESS_TOKEN", value_delimiter = ',', hide_env_values = true)]
    access_tokens: Vec<String>,

    /// Network for deposit data (mainnet, prater, holesky)
    #[arg(short, long)]
    network: Option<Network>,
}

impl Args {
    fn apply(self, config: &mut VaultConfig) {
        if let Some(listen) = self.listen {
            config.http.listen = listen;
        }
        if let Some(data_dir) = self.data_dir {
            config.storage.data_dir = data_dir;
        }
        if !self.access_tokens.is_empty() {
            config.auth.access_tokens = self.access_tokens;
        }
        if let Some(network) = self.network {
            config.network.name = network;
        }
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .with_context(|| format!("invalid log filter {:?}", logging.filter))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("[vault] Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[vault] Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VaultConfig::load(path)?,
        None => VaultConfig::default(),
    };
    args.apply(&mut config);

    init_logging(&config.logging)?;
    config.validate().context("invalid configuration")?;

    info!("===========================================");
    info!("  Key-Vault v{}", env!("CARGO_PKG_VERSION"));
    info!("  Network: {}", config.network.name);
    info!("===========================================");
    info!("Data Dir: {}", config.storage.data_dir.display());
    info!("Base Path: {}", config.http.routes.base_path);

    let app = build_app(&config)?;
    let listener = tokio::net::TcpListener::bind(config.http.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.http.listen))?;

    serve(listener, app, shutdown_signal()).await
}
