// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use frog_tips::config::DEFAULT_TIP_FUNCTION;
use thiserror::Error;

pub const DEFAULT_CHAIN_API_URL: &str = "https://api.testnet.hiro.so";
pub const DEFAULT_TIPS_CONTRACT: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.frog-tips";
pub const DEFAULT_CHAIN_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is required when {because}")]
    Missing { key: &'static str, because: &'static str },
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// A credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(pub String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Where posts and tip receipts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process tables, optionally snapshotted to `NodeConfig::snapshot_path`.
    Memory,
    /// Hosted Postgres behind its REST gateway.
    Postgrest { url: String, service_key: Secret },
}

/// Where archived post payloads live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobBackend {
    Memory,
    Fs { root: PathBuf },
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key_id: Option<Secret>,
        secret_access_key: Option<Secret>,
    },
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub chain_api_url: String,
    pub chain_timeout_secs: u64,
    pub tips_contract_id: String,
    pub tip_function: String,
    /// Bearer token for admin routes. `None` leaves them open.
    pub auth_token: Option<Secret>,
    pub store: StoreBackend,
    pub snapshot_path: Option<PathBuf>,
    pub auto_snapshot_interval_secs: Option<u64>,
    pub blob: BlobBackend,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            chain_api_url: DEFAULT_CHAIN_API_URL.to_string(),
            chain_timeout_secs: DEFAULT_CHAIN_TIMEOUT_SECS,
            tips_contract_id: DEFAULT_TIPS_CONTRACT.to_string(),
            tip_function: DEFAULT_TIP_FUNCTION.to_string(),
            auth_token: None,
            store: StoreBackend::Memory,
            snapshot_path: None,
            auto_snapshot_interval_secs: None,
            blob: BlobBackend::Memory,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults overridden by whatever `lookup` returns.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("FROG_BIND_ADDR") {
            cfg.bind_addr = parse("FROG_BIND_ADDR", &v)?;
        }
        if let Some(v) = get("FROG_CHAIN_API_URL") {
            cfg.chain_api_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("FROG_CHAIN_TIMEOUT_SECS") {
            cfg.chain_timeout_secs = parse("FROG_CHAIN_TIMEOUT_SECS", &v)?;
            if cfg.chain_timeout_secs == 0 {
                return Err(ConfigError::Invalid { key: "FROG_CHAIN_TIMEOUT_SECS", value: v });
            }
        }
        if let Some(v) = get("FROG_TIPS_CONTRACT") {
            if !v.contains('.') {
                return Err(ConfigError::Invalid { key: "FROG_TIPS_CONTRACT", value: v });
            }
            cfg.tips_contract_id = v;
        }
        if let Some(v) = get("FROG_TIP_FUNCTION") {
            cfg.tip_function = v;
        }
        cfg.auth_token = get("FROG_ADMIN_TOKEN").map(Secret);

        if let Some(url) = get("SUPABASE_URL") {
            let service_key = get("SUPABASE_SERVICE_ROLE_KEY").ok_or(ConfigError::Missing {
                key: "SUPABASE_SERVICE_ROLE_KEY",
                because: "SUPABASE_URL is set",
            })?;
            cfg.store = StoreBackend::Postgrest {
                url: url.trim_end_matches('/').to_string(),
                service_key: Secret(service_key),
            };
        }

        cfg.snapshot_path = get("FROG_SNAPSHOT_PATH").map(PathBuf::from);
        if let Some(v) = get("FROG_SNAPSHOT_INTERVAL_SECS") {
            cfg.auto_snapshot_interval_secs = Some(parse("FROG_SNAPSHOT_INTERVAL_SECS", &v)?);
        }

        cfg.blob = match get("FROG_BLOB_BACKEND").as_deref() {
            None | Some("memory") => BlobBackend::Memory,
            Some("fs") => BlobBackend::Fs {
                root: get("FROG_BLOB_ROOT").map(PathBuf::from).ok_or(ConfigError::Missing {
                    key: "FROG_BLOB_ROOT",
                    because: "FROG_BLOB_BACKEND=fs",
                })?,
            },
            Some("s3") => BlobBackend::S3 {
                bucket: get("FROG_S3_BUCKET").ok_or(ConfigError::Missing {
                    key: "FROG_S3_BUCKET",
                    because: "FROG_BLOB_BACKEND=s3",
                })?,
                region: get("FROG_S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint: get("FROG_S3_ENDPOINT"),
                access_key_id: get("AWS_ACCESS_KEY_ID").map(Secret),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY").map(Secret),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "FROG_BLOB_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        Ok(cfg)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
