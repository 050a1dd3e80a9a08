//! Bridge configuration
//!
//! Hosts pass configuration as JSON; every field has a default so an empty
//! object (or no config at all) yields the stock setup.

use anyhow::{Context, Result};
use naclfs_vfs::DEFAULT_QUOTA_BYTES;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Quota requested when acquiring the sandboxed filesystem
    pub quota_bytes: u64,
    /// Echo each RPC request and failed reply to the console at info level
    pub trace_rpc: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            quota_bytes: DEFAULT_QUOTA_BYTES,
            trace_rpc: true,
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid bridge config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.quota_bytes, 1024 * 1024);
        assert!(config.trace_rpc);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BridgeConfig::from_json(r#"{ "trace_rpc": false }"#).unwrap();
        assert_eq!(config.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert!(!config.trace_rpc);

        assert_eq!(BridgeConfig::from_json("{}").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(BridgeConfig::from_json("not json").is_err());
        assert!(BridgeConfig::from_json(r#"{ "quota": 1 }"#).is_err());
    }
}
