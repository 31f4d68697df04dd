//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

/// Public Solana devnet endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Default RPC request timeout in seconds
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Directory holding the persisted wallet record
    pub data_dir: PathBuf,
    /// Solana JSON-RPC endpoint
    pub rpc_url: String,
    /// RPC request timeout
    pub rpc_timeout: Duration,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        }
    }
}

impl WalletConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("DEVKIT_WALLET_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let rpc_url = lookup("SOLANA_RPC_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let rpc_timeout_secs = lookup("SOLANA_RPC_TIMEOUT_SECS")
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(DEFAULT_RPC_TIMEOUT_SECS);

        Self {
            data_dir,
            rpc_url,
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".devkit-wallet"))
        .unwrap_or_else(|| PathBuf::from(".devkit-wallet"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WalletConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
        assert!(config.data_dir.ends_with(".devkit-wallet"));
    }

    #[test]
    fn test_overrides() {
        let config = WalletConfig::from_lookup(lookup_from(&[
            ("DEVKIT_WALLET_DIR", "/tmp/wallet"),
            ("SOLANA_RPC_URL", "http://127.0.0.1:8899"),
            ("SOLANA_RPC_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wallet"));
        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.rpc_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = WalletConfig::from_lookup(lookup_from(&[("SOLANA_RPC_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.rpc_timeout, Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS));
    }
}
