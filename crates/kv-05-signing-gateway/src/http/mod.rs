//! # HTTP Interface
//!
//! axum router for the vault API. All routes sit under the configured base
//! path and behind the bearer-token layer.

mod auth;
pub mod handlers;
mod response;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use kv_03_key_manager::SigningRoutes;
use kv_04_wallet_store::Network;
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use auth::{constant_time_compare, AuthLayer};
pub use response::{data, ApiJson, Data, Errors};

use crate::ports::WalletDirectory;
use crate::service::SigningGateway;

/// Default request body cap.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Static facts about the running vault.
#[derive(Debug, Clone, Serialize)]
pub struct VaultInfo {
    pub version: String,
    pub network: Network,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<SigningGateway>,
    pub wallets: Arc<dyn WalletDirectory>,
    pub info: VaultInfo,
}

/// Router configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub routes: SigningRoutes,
    pub access_tokens: Vec<String>,
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            routes: SigningRoutes::default(),
            access_tokens: Vec::new(),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

fn relative(route: &str) -> String {
    format!("/{}", route.trim_matches('/'))
}

/// Build the vault router.
pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    let routes = &config.routes;

    let api = Router::new()
        .route("/version", get(handlers::version))
        .route("/config", get(handlers::config))
        .route("/wallets", get(handlers::list_wallets))
        .route(
            "/wallets/:wallet",
            post(handlers::create_wallet).get(handlers::get_wallet),
        )
        .route("/wallets/:wallet/accounts", get(handlers::list_accounts))
        .route(
            "/wallets/:wallet/accounts/:account",
            post(handlers::create_account).get(handlers::get_account),
        )
        .route(
            "/wallets/:wallet/accounts/:account/deposit-data",
            get(handlers::deposit_data),
        )
        .route(&relative(&routes.aggregation), post(handlers::sign_aggregation))
        .route(&relative(&routes.proposal), post(handlers::sign_proposal))
        .route(&relative(&routes.attestation), post(handlers::sign_attestation))
        .route(
            "/storage/slashing",
            get(handlers::export_slashing).post(handlers::import_slashing),
        )
        .with_state(state);

    Router::new()
        .nest(routes.base_path.trim_end_matches('/'), api)
        .layer(AuthLayer::new(config.access_tokens.clone()))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
