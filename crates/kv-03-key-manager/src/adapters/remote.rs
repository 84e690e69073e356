//! # Remote HTTP Wallet
//!
//! Delegates signing for one configured public key to a signing daemon
//! that speaks the protocol in `crate::protocol`.
//!
//! Each call is exactly one POST. There is no retry: a failed round trip
//! is reported to the caller, who decides what to do with the slot.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use shared_types::{AttestationData, BeaconBlockHeader, BlsPublicKey, BlsSignature, Domain, Root};
use tracing::{debug, error};

use crate::error::{KeyManagerError, KeyManagerResult};
use crate::ports::KeyManager;
use crate::protocol::{
    SignAggregationRequest, SignAttestationRequest, SignProposalRequest, SignResponse,
    SigningRoutes,
};

/// Per-request timeout when the options don't set one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Construction options: `{location, accessToken, pubKey}`.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteWalletOptions {
    /// Daemon root URL, e.g. `http://127.0.0.1:8200`.
    pub location: String,
    pub access_token: String,
    /// Hex-encoded 48-byte public key the daemon signs for.
    pub pub_key: String,
    pub request_timeout_secs: Option<u64>,
}

impl RemoteWalletOptions {
    /// Parse options from their JSON form.
    pub fn from_json(json: &str) -> KeyManagerResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            KeyManagerError::Validation(format!("invalid remote wallet options: {}", e))
        })
    }
}

impl fmt::Debug for RemoteWalletOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteWalletOptions")
            .field("location", &self.location)
            .field("access_token", &"<redacted>")
            .field("pub_key", &self.pub_key)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn required<'a>(name: &str, value: &'a str) -> KeyManagerResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(KeyManagerError::Validation(format!(
            "remote wallet option \"{}\" is required",
            name
        )));
    }
    Ok(value)
}

/// Key manager backed by a remote signing daemon.
pub struct RemoteHttpWallet {
    location: String,
    access_token: String,
    public_key: BlsPublicKey,
    routes: SigningRoutes,
    client: Client,
}

impl RemoteHttpWallet {
    /// Validate `options` and build the HTTP client. No network access.
    pub fn new(options: &RemoteWalletOptions, routes: SigningRoutes) -> KeyManagerResult<Self> {
        let location = required("location", &options.location)?;
        let access_token = required("accessToken", &options.access_token)?;
        let pub_key = required("pubKey", &options.pub_key)?;

        Url::parse(location).map_err(|e| {
            KeyManagerError::Validation(format!("invalid remote wallet location {}: {}", location, e))
        })?;
        let public_key = BlsPublicKey::from_hex("pubKey", pub_key)
            .map_err(|e| KeyManagerError::Validation(e.to_string()))?;

        let timeout = match options.request_timeout_secs {
            Some(0) => {
                return Err(KeyManagerError::Validation(
                    "remote wallet option \"requestTimeoutSecs\" must be positive".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| KeyManagerError::Network {
                context: "building remote wallet HTTP client".to_string(),
                source,
            })?;

        Ok(Self {
            location: location.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            public_key,
            routes,
            client,
        })
    }

    /// Build from the JSON form of the options.
    pub fn from_json(json: &str, routes: SigningRoutes) -> KeyManagerResult<Self> {
        Self::new(&RemoteWalletOptions::from_json(json)?, routes)
    }

    /// Identity guard: this wallet only ever signs for its configured key.
    fn ensure_key(&self, public_key: &BlsPublicKey) -> KeyManagerResult<()> {
        if *public_key != self.public_key {
            return Err(KeyManagerError::NoSuchKey(*public_key));
        }
        Ok(())
    }

    async fn post<T: Serialize + Sync>(&self, route: &str, body: &T) -> KeyManagerResult<BlsSignature> {
        let endpoint = self.routes.url(&self.location, route);
        debug!(
            location = %self.location,
            public_key = %self.public_key,
            endpoint = %endpoint,
            "[kv-03] Remote signing request"
        );

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|source| {
                error!(
                    location = %self.location,
                    public_key = %self.public_key,
                    "[kv-03] Remote signer unreachable: {}",
                    source
                );
                KeyManagerError::Network {
                    context: format!("request to {} failed", endpoint),
                    source,
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| KeyManagerError::Network {
                context: format!("reading response from {}", endpoint),
                source,
            })?;

        if status != StatusCode::OK {
            error!(
                location = %self.location,
                public_key = %self.public_key,
                status = status.as_u16(),
                "[kv-03] Remote signer refused request: {}",
                text
            );
            return Err(KeyManagerError::Transport {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SignResponse =
            serde_json::from_str(&text).map_err(|e| KeyManagerError::Encoding {
                context: format!("decoding response from {}", endpoint),
                reason: e.to_string(),
            })?;

        Ok(BlsSignature::from_hex("signature", &parsed.data.signature)?)
    }
}

impl fmt::Debug for RemoteHttpWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteHttpWallet")
            .field("location", &self.location)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyManager for RemoteHttpWallet {
    async fn sign(&self, _public_key: &BlsPublicKey, _root: &Root) -> KeyManagerResult<BlsSignature> {
        Err(KeyManagerError::UnprotectedSigningUnsupported)
    }

    async fn sign_generic(
        &self,
        public_key: &BlsPublicKey,
        root: &Root,
        domain: &Domain,
    ) -> KeyManagerResult<BlsSignature> {
        self.ensure_key(public_key)?;
        let body = SignAggregationRequest {
            pubkey: *public_key,
            domain: *domain,
            data_to_sign: *root,
        };
        self.post(&self.routes.aggregation, &body).await
    }

    async fn sign_proposal(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> KeyManagerResult<BlsSignature> {
        self.ensure_key(public_key)?;
        let body = SignProposalRequest::new(*public_key, *domain, header);
        self.post(&self.routes.proposal, &body).await
    }

    async fn sign_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> KeyManagerResult<BlsSignature> {
        self.ensure_key(public_key)?;
        let body = SignAttestationRequest::new(*public_key, *domain, data);
        self.post(&self.routes.attestation, &body).await
    }

    async fn fetch_validating_keys(&self) -> KeyManagerResult<Vec<BlsPublicKey>> {
        Ok(vec![self.public_key])
    }
}
