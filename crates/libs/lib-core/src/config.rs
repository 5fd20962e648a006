//! # Application Configuration
//!
//! This module manages configuration loaded from environment variables.
//! All configuration is validated on load to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let rpc_url = &config.rpc_url;
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].

use crate::error::{AppError, Result as CoreResult};
use lib_utils::envs::{get_env_opt, get_env_or};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Program id of the mainline SPL governance deployment.
pub const DEFAULT_GOVERNANCE_PROGRAM_ID: &str = "GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw";

/// Network cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cluster {
    Localnet,
    Devnet,
    Mainnet,
}

impl Cluster {
    pub fn as_str(&self) -> &str {
        match self {
            Cluster::Localnet => "localnet",
            Cluster::Devnet => "devnet",
            Cluster::Mainnet => "mainnet",
        }
    }

    /// Public RPC endpoint for the cluster.
    ///
    /// Mainnet uses Helius when an API key is available.
    pub fn default_rpc_url(&self, helius_api_key: Option<&str>) -> String {
        match self {
            Cluster::Localnet => "http://127.0.0.1:8899".to_string(),
            Cluster::Devnet => "https://api.devnet.solana.com".to_string(),
            Cluster::Mainnet => match helius_api_key {
                Some(key) => format!("https://mainnet.helius-rpc.com/?api-key={}", key),
                None => "https://api.mainnet-beta.solana.com".to_string(),
            },
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => Err(format!("Unknown cluster: {}", other)),
        }
    }
}

/// Configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Cluster the governance program is deployed on
    pub cluster: Cluster,

    /// JSON-RPC endpoint used for account lookups
    pub rpc_url: String,

    /// Digital Asset Standard endpoint used to list a voter's NFTs
    ///
    /// Defaults to `rpc_url`; plain Solana validators do not serve DAS, so an
    /// indexer-backed endpoint is expected here when NFT voting is in use.
    pub das_url: String,

    /// SPL governance program id (base58)
    pub governance_program_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let cluster = get_env_or("SOLANA_NETWORK", "mainnet").parse::<Cluster>()?;

        let helius_api_key = get_env_opt("HELIUS_API_KEY");
        let rpc_url = get_env_opt("SOLANA_RPC_URL")
            .unwrap_or_else(|| cluster.default_rpc_url(helius_api_key.as_deref()));

        let das_url = get_env_opt("DAS_RPC_URL").unwrap_or_else(|| rpc_url.clone());

        let governance_program_id = get_env_or("GOVERNANCE_PROGRAM_ID", DEFAULT_GOVERNANCE_PROGRAM_ID);

        Ok(Self {
            cluster,
            rpc_url,
            das_url,
            governance_program_id,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("SOLANA_RPC_URL", &self.rpc_url), ("DAS_RPC_URL", &self.das_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{} must be an http(s) URL", name));
            }
        }

        let decoded = bs58::decode(&self.governance_program_id)
            .into_vec()
            .map_err(|e| format!("GOVERNANCE_PROGRAM_ID is not valid base58: {}", e))?;
        if decoded.len() != 32 {
            return Err("GOVERNANCE_PROGRAM_ID must decode to 32 bytes".to_string());
        }

        Ok(())
    }

    /// Validate, reporting failures as [`AppError::Config`].
    pub fn validated(self) -> CoreResult<Self> {
        self.validate().map_err(AppError::Config)?;
        Ok(self)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> CoreResult<()> {
    let config = Config::from_env().map_err(AppError::Config)?.validated()?;

    tracing::debug!("Configuration loaded for {}", config.cluster);

    CONFIG.set(config)
        .map_err(|_| AppError::Config("Config has already been initialized".to_string()))
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG.get().expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            cluster: Cluster::Devnet,
            rpc_url: "https://api.devnet.solana.com".to_string(),
            das_url: "https://api.devnet.solana.com".to_string(),
            governance_program_id: DEFAULT_GOVERNANCE_PROGRAM_ID.to_string(),
        }
    }

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("Mainnet-Beta".parse::<Cluster>().unwrap(), Cluster::Mainnet);
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert!("testnet".parse::<Cluster>().is_err());
    }

    #[test]
    fn test_mainnet_url_prefers_helius() {
        assert_eq!(
            Cluster::Mainnet.default_rpc_url(Some("k")),
            "https://mainnet.helius-rpc.com/?api-key=k"
        );
        assert_eq!(
            Cluster::Mainnet.default_rpc_url(None),
            "https://api.mainnet-beta.solana.com"
        );
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_program_id() {
        let mut cfg = config();
        cfg.governance_program_id = "not-a-key".to_string();
        assert!(cfg.validate().is_err());

        cfg.governance_program_id = "11111111".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_das_url() {
        let mut cfg = config();
        cfg.das_url = "wss://example".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_config_is_a_config_error() {
        let mut cfg = config();
        cfg.rpc_url = "api.devnet.solana.com".to_string();

        let err = cfg.validated().unwrap_err();
        assert_eq!(err.code(), "Config");
        assert_eq!(err.user_message(), "An internal error occurred");
    }
}
