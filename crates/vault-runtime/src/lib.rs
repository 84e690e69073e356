//! # Key-Vault Runtime
//!
//! Wires the subsystems into one HTTP service.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then CLI/env overrides) and validate it
//! 2. Open `wallets.db` and `slashing.db` under the data directory
//!    (each holds an exclusive process lock until shutdown)
//! 3. Build wallet store → slashing engine → signing gateway
//! 4. Serve the router until Ctrl+C

pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use kv_01_storage::FileBackedKVStore;
use kv_02_slashing_protection::{KvSlashingStore, SlashingProtection};
use kv_04_wallet_store::WalletStore;
use kv_05_signing_gateway::{build_router, AppState, SigningGateway, VaultInfo};
use tokio::net::TcpListener;
use tracing::info;

pub use config::{ConfigError, VaultConfig};

/// Open the stores and assemble the vault router.
pub fn build_app(config: &VaultConfig) -> Result<Router> {
    let wallets_path = config.storage.wallets_path();
    let slashing_path = config.storage.slashing_path();

    let wallets = Arc::new(WalletStore::new(
        FileBackedKVStore::open(&wallets_path)
            .with_context(|| format!("failed to open wallet store {}", wallets_path.display()))?,
        config.network.name,
    ));
    let slashing = Arc::new(SlashingProtection::new(KvSlashingStore::new(
        FileBackedKVStore::open(&slashing_path).with_context(|| {
            format!("failed to open slashing store {}", slashing_path.display())
        })?,
    )));

    let state = AppState {
        gateway: Arc::new(SigningGateway::new(wallets.clone(), slashing)),
        wallets,
        info: VaultInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            network: config.network.name,
        },
    };

    Ok(build_router(state, &config.http_config()))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    info!("[vault] 🔐 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("[vault] Server stopped");
    Ok(())
}
