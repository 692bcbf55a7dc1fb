//! Per-chain contract addresses.

use crate::fill::DEFAULT_GAS_PER_PUBDATA;
use crate::{Result, TransactionError, CONTRACT_DEPLOYER_ADDRESS};
use agw_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ABSTRACT_MAINNET_CHAIN_ID: u64 = 2741;
pub const ABSTRACT_TESTNET_CHAIN_ID: u64 = 11124;

const EOA_VALIDATOR: Address = Address::from_bytes([
    0x74, 0xb9, 0xae, 0x28, 0xec, 0x45, 0xe3, 0xfa, 0x11, 0x53, 0x3c, 0x79, 0x54, 0x75, 0x25, 0x97,
    0xc3, 0xde, 0x3e, 0x7a,
]);

const SESSION_KEY_VALIDATOR: Address = Address::from_bytes([
    0x34, 0xca, 0x15, 0x01, 0xfa, 0xe2, 0x31, 0xcc, 0x2e, 0xbc, 0x99, 0x5c, 0xe0, 0x13, 0xdb, 0xe8,
    0x82, 0xd7, 0xd0, 0x81,
]);

const ACCOUNT_FACTORY: Address = Address::from_bytes([
    0x9b, 0x94, 0x7d, 0xf6, 0x8d, 0x35, 0x28, 0x1c, 0x97, 0x25, 0x11, 0xb3, 0xe7, 0xbc, 0x87, 0x59,
    0x26, 0xf2, 0x6c, 0x1a,
]);

/// Contract addresses and defaults for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    /// Validator for signatures made by the account owner.
    pub eoa_validator: Address,
    pub session_key_validator: Address,
    pub account_factory: Address,
    #[serde(default = "default_contract_deployer")]
    pub contract_deployer: Address,
    #[serde(default = "default_gas_per_pubdata")]
    pub default_gas_per_pubdata: u64,
}

fn default_contract_deployer() -> Address {
    CONTRACT_DEPLOYER_ADDRESS
}

fn default_gas_per_pubdata() -> u64 {
    DEFAULT_GAS_PER_PUBDATA
}

impl ChainConfig {
    fn abstract_chain(chain_id: u64, name: &str) -> Self {
        Self {
            chain_id,
            name: name.to_string(),
            eoa_validator: EOA_VALIDATOR,
            session_key_validator: SESSION_KEY_VALIDATOR,
            account_factory: ACCOUNT_FACTORY,
            contract_deployer: CONTRACT_DEPLOYER_ADDRESS,
            default_gas_per_pubdata: DEFAULT_GAS_PER_PUBDATA,
        }
    }
    
    pub fn abstract_mainnet() -> Self {
        Self::abstract_chain(ABSTRACT_MAINNET_CHAIN_ID, "Abstract")
    }
    
    pub fn abstract_testnet() -> Self {
        Self::abstract_chain(ABSTRACT_TESTNET_CHAIN_ID, "Abstract Testnet")
    }
}

/// Immutable lookup of chain configurations by chain id.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.chain_id, c)).collect(),
        }
    }
    
    /// Abstract mainnet and testnet.
    pub fn with_defaults() -> Self {
        Self::new([ChainConfig::abstract_mainnet(), ChainConfig::abstract_testnet()])
    }
    
    pub fn get(&self, chain_id: u64) -> Result<&ChainConfig> {
        self.chains
            .get(&chain_id)
            .ok_or(TransactionError::UnsupportedChain(chain_id))
    }
    
    pub fn contains(&self, chain_id: u64) -> bool {
        self.chains.contains_key(&chain_id)
    }
    
    /// Configurations ordered by chain id.
    pub fn chains(&self) -> Vec<&ChainConfig> {
        let mut chains: Vec<_> = self.chains.values().collect();
        chains.sort_by_key(|c| c.chain_id);
        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_registry() {
        let registry = ChainRegistry::with_defaults();
        let mainnet = registry.get(ABSTRACT_MAINNET_CHAIN_ID).unwrap();
        assert_eq!(
            format!("{:x}", mainnet.session_key_validator),
            "0x34ca1501fae231cc2ebc995ce013dbe882d7d081"
        );
        assert_eq!(
            format!("{:x}", mainnet.eoa_validator),
            "0x74b9ae28ec45e3fa11533c7954752597c3de3e7a"
        );
        assert_eq!(mainnet.default_gas_per_pubdata, 50_000);
        
        let ids: Vec<u64> = registry.chains().iter().map(|c| c.chain_id).collect();
        assert_eq!(ids, vec![2741, 11124]);
    }
    
    #[test]
    fn test_unsupported_chain() {
        let registry = ChainRegistry::with_defaults();
        assert!(matches!(registry.get(1), Err(TransactionError::UnsupportedChain(1))));
        assert!(!registry.contains(1));
    }
}
