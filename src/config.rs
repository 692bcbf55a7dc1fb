use std::collections::HashSet;
use std::fs;
use std::path::Path;

use agw_transaction::{ChainConfig, ChainRegistry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chains the SDK may target
    pub chains: Vec<ChainConfig>,
    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level, overridden by RUST_LOG
    pub level: String,
    /// Include module targets in log lines
    pub targets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chains: vec![ChainConfig::abstract_mainnet(), ChainConfig::abstract_testnet()],
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            targets: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context("Failed to read configuration file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        fs::write(path, content)
            .context("Failed to write configuration file")?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            anyhow::bail!("At least one chain must be configured");
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            if chain.chain_id == 0 {
                anyhow::bail!("chain_id must be greater than 0 ({})", chain.name);
            }
            if !seen.insert(chain.chain_id) {
                anyhow::bail!("Duplicate chain_id {}", chain.chain_id);
            }
            if chain.default_gas_per_pubdata == 0 {
                anyhow::bail!("default_gas_per_pubdata must be greater than 0 for chain {}", chain.chain_id);
            }
        }

        Ok(())
    }

    /// Build the chain registry from the configured chains
    pub fn chain_registry(&self) -> ChainRegistry {
        ChainRegistry::new(self.chains.iter().cloned())
    }

    /// Get configuration for a single network
    pub fn for_network(network: &str) -> Result<Self> {
        let chain = match network.to_lowercase().as_str() {
            "mainnet" | "abstract" => ChainConfig::abstract_mainnet(),
            "testnet" | "abstract-testnet" => ChainConfig::abstract_testnet(),
            _ => anyhow::bail!("Unknown network: {}", network),
        };

        Ok(Self {
            chains: vec![chain],
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agw_transaction::{ABSTRACT_MAINNET_CHAIN_ID, ABSTRACT_TESTNET_CHAIN_ID};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chains.len(), 2);
        assert_eq!(config.log.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();

        config.chains[1].chain_id = ABSTRACT_MAINNET_CHAIN_ID;
        assert!(config.validate().is_err());

        config.chains[1].chain_id = 0;
        assert!(config.validate().is_err());

        config.chains.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_network_config() {
        let mainnet = Config::for_network("mainnet").unwrap();
        assert_eq!(mainnet.chains[0].chain_id, ABSTRACT_MAINNET_CHAIN_ID);

        let testnet = Config::for_network("Testnet").unwrap();
        assert_eq!(testnet.chains[0].chain_id, ABSTRACT_TESTNET_CHAIN_ID);

        assert!(Config::for_network("goerli").is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agw.toml");

        let config = Config::default();
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.chains, config.chains);

        let registry = loaded.chain_registry();
        assert!(registry.contains(ABSTRACT_TESTNET_CHAIN_ID));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agw.toml");
        fs::write(&path, "[log]\nlevel = \"debug\"\n").unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.log.level, "debug");
        assert_eq!(loaded.chains.len(), 2);
    }
}
