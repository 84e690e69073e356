//! # Vault Configuration
//!
//! Optional TOML file, every section defaulted, then command-line and
//! environment overrides on top.
//!
//! ```toml
//! [http]
//! listen = "127.0.0.1:9000"
//! body_limit_bytes = 1048576
//!
//! [http.routes]
//! basePath = "/v1/ethereum"
//!
//! [storage]
//! data_dir = "/var/lib/key-vault"
//!
//! [auth]
//! access_tokens = ["..."]
//!
//! [network]
//! name = "holesky"
//!
//! [logging]
//! filter = "info,tower_http=debug"
//! ```
//!
//! ## Security Requirements
//!
//! - At least one non-empty access token MUST be configured; the vault
//!   never serves unauthenticated.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use kv_03_key_manager::SigningRoutes;
use kv_04_wallet_store::Network;
use kv_05_signing_gateway::http::DEFAULT_BODY_LIMIT;
use kv_05_signing_gateway::HttpConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store file holding wallets, accounts and the public-key index.
pub const WALLETS_FILE: &str = "wallets.db";
/// Store file holding slashing protection history.
pub const SLASHING_FILE: &str = "slashing.db";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no access token configured. Set KV_ACCESS_TOKEN or auth.access_tokens")]
    NoAccessTokens,

    #[error("access token list contains an empty token")]
    EmptyAccessToken,

    #[error("storage.data_dir must not be empty")]
    EmptyDataDir,

    #[error("invalid signing routes (base path {base_path:?})")]
    InvalidRoutes { base_path: String },
}

/// Complete vault configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub http: HttpSection,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub listen: SocketAddr,
    pub routes: SigningRoutes,
    pub body_limit_bytes: usize,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 9000)),
            routes: SigningRoutes::default(),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both store files.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl StorageConfig {
    pub fn wallets_path(&self) -> PathBuf {
        self.data_dir.join(WALLETS_FILE)
    }

    pub fn slashing_path(&self) -> PathBuf {
        self.data_dir.join(SLASHING_FILE)
    }
}

/// Bearer tokens accepted by the HTTP layer.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub access_tokens: Vec<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_tokens", &format_args!("[{} redacted]", self.access_tokens.len()))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: Network,
}

/// Log filter in `EnvFilter` syntax. `RUST_LOG` wins when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl VaultConfig {
    /// Load from a TOML file. Missing sections and fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Reject configurations the vault must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.access_tokens.is_empty() {
            return Err(ConfigError::NoAccessTokens);
        }
        if self.auth.access_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::EmptyAccessToken);
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if !self.http.routes.is_valid() {
            return Err(ConfigError::InvalidRoutes {
                base_path: self.http.routes.base_path.clone(),
            });
        }
        Ok(())
    }

    /// Router settings for the gateway.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            routes: self.http.routes.clone(),
            access_tokens: self.auth.access_tokens.clone(),
            body_limit_bytes: self.http.body_limit_bytes,
        }
    }
}
