//! HTTP handlers.
//!
//! Store calls end in an fsync, so they run on the blocking pool.

use axum::extract::{Path, State};
use axum::Json;
use kv_02_slashing_protection::{AttestationVote, VoteRecord};
use kv_03_key_manager::protocol::{
    SignAggregationRequest, SignAttestationRequest, SignProposalRequest, SignResponse,
};
use kv_04_wallet_store::{DepositData, WalletResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{deserialize_field, encode_hex, BlsPublicKey, Slot};

use crate::error::{GatewayError, GatewayResult};
use crate::http::response::{data, ApiJson, Data};
use crate::http::AppState;
use crate::ports::WalletDirectory;

type ApiResult<T> = GatewayResult<Json<Data<T>>>;

const WALLET_NOT_FOUND: &str = "failed to retrieve wallet by name: no wallet found";
const ACCOUNT_NOT_FOUND: &str = "account not found";

async fn with_wallets<T, F>(state: &AppState, op: F) -> GatewayResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn WalletDirectory) -> WalletResult<T> + Send + 'static,
{
    let wallets = state.wallets.clone();
    let result = tokio::task::spawn_blocking(move || op(wallets.as_ref()))
        .await
        .map_err(|e| GatewayError::Internal(format!("wallet operation aborted: {}", e)))?;
    Ok(result?)
}

// =============================================================================
// INFO
// =============================================================================

pub async fn version(State(state): State<AppState>) -> Json<Data<Value>> {
    data(json!({ "version": state.info.version }))
}

pub async fn config(State(state): State<AppState>) -> Json<Data<Value>> {
    data(json!({
        "network": state.info.network,
        "forkVersion": encode_hex(&state.info.network.fork_version()),
    }))
}

// =============================================================================
// WALLETS & ACCOUNTS
// =============================================================================

pub async fn list_wallets(State(state): State<AppState>) -> ApiResult<Value> {
    let wallets = with_wallets(&state, |w| w.list_wallets()).await?;
    Ok(data(json!({ "wallets": wallets })))
}

pub async fn create_wallet(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> ApiResult<Value> {
    let wallet = with_wallets(&state, move |w| w.create_wallet(&wallet)).await?;
    Ok(data(json!({ "wallet": wallet })))
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> ApiResult<Value> {
    let wallet = with_wallets(&state, move |w| w.get_wallet(&wallet))
        .await?
        .ok_or_else(|| GatewayError::NotFound(WALLET_NOT_FOUND.to_string()))?;
    Ok(data(json!({ "wallet": wallet })))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> ApiResult<Value> {
    let accounts = with_wallets(&state, move |w| w.list_accounts(&wallet)).await?;
    Ok(data(json!({ "accounts": accounts })))
}

pub async fn create_account(
    State(state): State<AppState>,
    Path((wallet, account)): Path<(String, String)>,
) -> ApiResult<Value> {
    let account = with_wallets(&state, move |w| w.create_account(&wallet, &account)).await?;
    Ok(data(json!({ "account": account })))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path((wallet, account)): Path<(String, String)>,
) -> ApiResult<Value> {
    let account = with_wallets(&state, move |w| w.get_account(&wallet, &account))
        .await?
        .ok_or_else(|| GatewayError::NotFound(ACCOUNT_NOT_FOUND.to_string()))?;
    Ok(data(json!({ "account": account })))
}

pub async fn deposit_data(
    State(state): State<AppState>,
    Path((wallet, account)): Path<(String, String)>,
) -> ApiResult<DepositData> {
    let deposit = with_wallets(&state, move |w| w.get_deposit_data(&wallet, &account))
        .await?
        .ok_or_else(|| GatewayError::NotFound(ACCOUNT_NOT_FOUND.to_string()))?;
    Ok(data(deposit))
}

// =============================================================================
// SIGNING
// =============================================================================

pub async fn sign_aggregation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignAggregationRequest>,
) -> GatewayResult<Json<SignResponse>> {
    let signature = state
        .gateway
        .sign_aggregation(&request.pubkey, &request.domain, &request.data_to_sign)
        .await?;
    Ok(Json(SignResponse::new(&signature)))
}

pub async fn sign_proposal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignProposalRequest>,
) -> GatewayResult<Json<SignResponse>> {
    let signature = state
        .gateway
        .sign_proposal(&request.pubkey, &request.domain, &request.header())
        .await?;
    Ok(Json(SignResponse::new(&signature)))
}

pub async fn sign_attestation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignAttestationRequest>,
) -> GatewayResult<Json<SignResponse>> {
    let signature = state
        .gateway
        .sign_attestation(&request.pubkey, &request.domain, &request.data())
        .await?;
    Ok(Json(SignResponse::new(&signature)))
}

// =============================================================================
// SLASHING HISTORY
// =============================================================================

/// One key's history in the export/import format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlashingHistoryEntry {
    #[serde(deserialize_with = "history_public_key")]
    pub public_key: BlsPublicKey,
    #[serde(default)]
    pub last_attestation: Option<AttestationVote>,
    #[serde(default)]
    pub last_proposal_slot: Option<Slot>,
}

fn history_public_key<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<BlsPublicKey, D::Error> {
    deserialize_field("publicKey", deserializer)
}

impl SlashingHistoryEntry {
    fn new(public_key: BlsPublicKey, record: VoteRecord) -> Self {
        Self {
            public_key,
            last_attestation: record.last_attestation,
            last_proposal_slot: record.last_proposal_slot,
        }
    }

    fn into_record(self) -> (BlsPublicKey, VoteRecord) {
        (
            self.public_key,
            VoteRecord {
                last_attestation: self.last_attestation,
                last_proposal_slot: self.last_proposal_slot,
            },
        )
    }
}

/// Import body; same shape as the export response.
#[derive(Debug, Deserialize)]
pub struct SlashingHistory {
    pub data: Vec<SlashingHistoryEntry>,
}

pub async fn export_slashing(State(state): State<AppState>) -> ApiResult<Vec<SlashingHistoryEntry>> {
    let records = state.gateway.export_slashing().await?;
    Ok(data(
        records
            .into_iter()
            .map(|(pk, record)| SlashingHistoryEntry::new(pk, record))
            .collect(),
    ))
}

pub async fn import_slashing(
    State(state): State<AppState>,
    ApiJson(history): ApiJson<SlashingHistory>,
) -> ApiResult<Value> {
    if let Some(entry) = history.data.iter().find(|e| {
        e.last_attestation
            .is_some_and(|a| a.source_epoch > a.target_epoch)
    }) {
        return Err(GatewayError::Validation(format!(
            "slashing history for {} has source epoch after target epoch",
            entry.public_key
        )));
    }

    let records = history
        .data
        .into_iter()
        .map(SlashingHistoryEntry::into_record)
        .collect();
    let updated = state.gateway.import_slashing(records).await?;
    Ok(data(json!({ "updated": updated })))
}
