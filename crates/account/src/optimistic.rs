//! Signing before the account is deployed or funded.
//!
//! Chain reads about the account are replaced by assumed state, and the
//! same state is handed back so callers can simulate the transaction with
//! matching `eth_call` state overrides.

use agw_types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Caller-supplied assumptions; unset fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimisticOverrides {
    #[serde(default)]
    pub balance: Option<U256>,
    #[serde(default)]
    pub is_deployed: Option<bool>,
    #[serde(default)]
    pub validation_hooks: Option<Vec<Address>>,
}

impl OptimisticOverrides {
    /// Fill unset fields: unlimited balance, deployed, and the session-key
    /// validator as the only validation hook.
    pub fn resolve(&self, session_key_validator: Address) -> AccountStateOverride {
        AccountStateOverride {
            balance: self.balance.unwrap_or(U256::MAX),
            is_deployed: self.is_deployed.unwrap_or(true),
            validation_hooks: self
                .validation_hooks
                .clone()
                .unwrap_or_else(|| vec![session_key_validator]),
        }
    }
}

/// State assumed for the account while signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStateOverride {
    pub balance: U256,
    pub is_deployed: bool,
    pub validation_hooks: Vec<Address>,
}

impl AccountStateOverride {
    /// Hooks the signature envelope is built for. An undeployed account has
    /// none installed, whatever hooks were assumed.
    pub fn signing_hooks(&self) -> &[Address] {
        if self.is_deployed {
            &self.validation_hooks
        } else {
            &[]
        }
    }
    
    /// `eth_call` state override set for `account`. An undeployed account
    /// is given empty code.
    pub fn state_override(&self, account: Address) -> Value {
        let mut entry = Map::new();
        entry.insert("balance".to_string(), json!(crate::value::hex_quantity(self.balance)));
        if !self.is_deployed {
            entry.insert("code".to_string(), json!("0x"));
        }
        
        let mut overrides = Map::new();
        overrides.insert(format!("{:x}", account), Value::Object(entry));
        Value::Object(overrides)
    }
}

/// Result of optimistic signing. Nothing has been submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticTransaction {
    /// Signed, serialized transaction.
    pub raw: Bytes,
    pub state: AccountStateOverride,
    pub state_override: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_defaults() {
        let session_validator = Address::from_bytes([0x34; 20]);
        let state = OptimisticOverrides::default().resolve(session_validator);
        assert_eq!(state.balance, U256::MAX);
        assert!(state.is_deployed);
        assert_eq!(state.validation_hooks, vec![session_validator]);
    }
    
    #[test]
    fn test_explicit_values_win() {
        let overrides = OptimisticOverrides {
            balance: Some(U256::from(5u8)),
            is_deployed: Some(false),
            validation_hooks: Some(vec![]),
        };
        let state = overrides.resolve(Address::from_bytes([0x34; 20]));
        assert_eq!(state.balance, U256::from(5u8));
        assert!(!state.is_deployed);
        assert!(state.validation_hooks.is_empty());
    }
    
    #[test]
    fn test_state_override_shape() {
        let account = Address::from_bytes([0xaa; 20]);
        let state = OptimisticOverrides {
            balance: Some(U256::from(255u8)),
            ..Default::default()
        }
        .resolve(Address::zero());
        
        let value = state.state_override(account);
        assert_eq!(value["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]["balance"], "0xff");
        assert!(value["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"].get("code").is_none());
    }
    
    #[test]
    fn test_undeployed_account_has_no_hooks_or_code() {
        let account = Address::from_bytes([0xaa; 20]);
        let session_validator = Address::from_bytes([0x34; 20]);
        let deployed = OptimisticOverrides::default().resolve(session_validator);
        let undeployed = OptimisticOverrides {
            is_deployed: Some(false),
            ..Default::default()
        }
        .resolve(session_validator);
        
        assert_eq!(deployed.signing_hooks(), &[session_validator][..]);
        assert!(undeployed.signing_hooks().is_empty());
        assert_eq!(undeployed.validation_hooks, vec![session_validator]);
        
        let value = undeployed.state_override(account);
        assert_eq!(value["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]["code"], "0x");
        assert_ne!(value, deployed.state_override(account));
    }
}
