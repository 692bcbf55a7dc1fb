//! Session permission policies.
//!
//! Plain value types; construction never fails. Field ranges are checked by
//! the codec when a session is encoded.

use agw_types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

/// How a numeric limit is consumed over the session's life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum LimitType {
    #[default]
    Unlimited = 0,
    Lifetime = 1,
    Allowance = 2,
}

impl LimitType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LimitType::Unlimited),
            1 => Some(LimitType::Lifetime),
            2 => Some(LimitType::Allowance),
            _ => None,
        }
    }
}

/// Spending or usage limit.
///
/// `period` is in seconds and only meaningful for [`LimitType::Allowance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limit {
    pub limit_type: LimitType,
    #[serde(default)]
    pub limit: U256,
    #[serde(default)]
    pub period: U256,
}

impl Limit {
    pub fn unlimited() -> Self {
        Self::default()
    }
    
    /// Total budget for the whole session.
    pub fn lifetime(limit: U256) -> Self {
        Self {
            limit_type: LimitType::Lifetime,
            limit,
            period: U256::zero(),
        }
    }
    
    /// Budget that resets every `period` seconds.
    pub fn allowance(limit: U256, period: U256) -> Self {
        Self {
            limit_type: LimitType::Allowance,
            limit,
            period,
        }
    }
    
    /// Blocks any spending.
    pub fn zero() -> Self {
        Self::lifetime(U256::zero())
    }
    
    /// Form written on chain: unlimited limits carry zero amount and period.
    pub fn canonical(&self) -> Self {
        match self.limit_type {
            LimitType::Unlimited => Self::unlimited(),
            _ => *self,
        }
    }
}

/// Relational operator applied to a call argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum ConstraintCondition {
    #[default]
    Unconstrained = 0,
    Equal = 1,
    Greater = 2,
    Less = 3,
    GreaterOrEqual = 4,
    LessOrEqual = 5,
    NotEqual = 6,
}

impl ConstraintCondition {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ConstraintCondition::Unconstrained),
            1 => Some(ConstraintCondition::Equal),
            2 => Some(ConstraintCondition::Greater),
            3 => Some(ConstraintCondition::Less),
            4 => Some(ConstraintCondition::GreaterOrEqual),
            5 => Some(ConstraintCondition::LessOrEqual),
            6 => Some(ConstraintCondition::NotEqual),
            _ => None,
        }
    }
}

/// Restriction on one 32-byte ABI argument of a permitted call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub condition: ConstraintCondition,
    /// Argument index into the calldata following the selector.
    pub index: u64,
    pub ref_value: H256,
    #[serde(default)]
    pub limit: Limit,
}

impl Constraint {
    pub fn new(condition: ConstraintCondition, index: u64, ref_value: H256) -> Self {
        Self {
            condition,
            index,
            ref_value,
            limit: Limit::unlimited(),
        }
    }
    
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPolicy {
    pub target: Address,
    /// Function selector; must be 4 bytes to encode.
    pub selector: Bytes,
    #[serde(default)]
    pub max_value_per_use: U256,
    #[serde(default = "Limit::zero")]
    pub value_limit: Limit,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl CallPolicy {
    /// A call policy that allows no value to be sent along with the call.
    pub fn new(target: Address, selector: impl Into<Bytes>) -> Self {
        Self {
            target,
            selector: selector.into(),
            max_value_per_use: U256::zero(),
            value_limit: Limit::zero(),
            constraints: Vec::new(),
        }
    }
    
    pub fn with_value(mut self, max_value_per_use: U256, value_limit: Limit) -> Self {
        self.max_value_per_use = max_value_per_use;
        self.value_limit = value_limit;
        self
    }
    
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPolicy {
    pub target: Address,
    pub max_value_per_use: U256,
    pub value_limit: Limit,
}

impl TransferPolicy {
    pub fn new(target: Address, max_value_per_use: U256, value_limit: Limit) -> Self {
        Self {
            target,
            max_value_per_use,
            value_limit,
        }
    }
}

/// Full session configuration.
///
/// Policy order matters: the validator uses the first matching policy, and
/// the order is part of the session hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub signer: Address,
    /// Unix seconds; 0 never expires.
    pub expires_at: u64,
    pub fee_limit: Limit,
    #[serde(default)]
    pub call_policies: Vec<CallPolicy>,
    #[serde(default)]
    pub transfer_policies: Vec<TransferPolicy>,
}

impl SessionConfig {
    pub fn new(signer: Address, expires_at: u64, fee_limit: Limit) -> Self {
        Self {
            signer,
            expires_at,
            fee_limit,
            call_policies: Vec::new(),
            transfer_policies: Vec::new(),
        }
    }
    
    pub fn with_call_policy(mut self, policy: CallPolicy) -> Self {
        self.call_policies.push(policy);
        self
    }
    
    pub fn with_transfer_policy(mut self, policy: TransferPolicy) -> Self {
        self.transfer_policies.push(policy);
        self
    }
    
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at != 0 && now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_canonical_unlimited() {
        let sloppy = Limit {
            limit_type: LimitType::Unlimited,
            limit: U256::from(5u8),
            period: U256::from(60u8),
        };
        assert_eq!(sloppy.canonical(), Limit::unlimited());
        
        let allowance = Limit::allowance(U256::from(5u8), U256::from(60u8));
        assert_eq!(allowance.canonical(), allowance);
    }
    
    #[test]
    fn test_expiry() {
        let config = SessionConfig::new(Address::zero(), 100, Limit::unlimited());
        assert!(!config.is_expired_at(99));
        assert!(config.is_expired_at(100));
        
        let forever = SessionConfig::new(Address::zero(), 0, Limit::unlimited());
        assert!(!forever.is_expired_at(u64::MAX));
    }
    
    #[test]
    fn test_invalid_selector_is_constructible() {
        let policy = CallPolicy::new(Address::zero(), vec![0x01, 0x02]);
        assert_eq!(policy.selector.len(), 2);
    }
    
    #[test]
    fn test_enum_values() {
        assert_eq!(LimitType::from_u8(2), Some(LimitType::Allowance));
        assert_eq!(LimitType::from_u8(3), None);
        assert_eq!(ConstraintCondition::from_u8(6), Some(ConstraintCondition::NotEqual));
        assert_eq!(ConstraintCondition::from_u8(7), None);
    }
    
    #[test]
    fn test_json_config() {
        let json = r#"{
            "signer": "0x1111111111111111111111111111111111111111",
            "expiresAt": 1700000000,
            "feeLimit": { "limitType": "lifetime", "limit": "0xde0b6b3a7640000" },
            "callPolicies": [{
                "target": "0x2222222222222222222222222222222222222222",
                "selector": "0xa9059cbb",
                "constraints": [{ "condition": "lessOrEqual", "index": 1, "refValue": "0x00000000000000000000000000000000000000000000000000000000000003e8" }]
            }]
        }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fee_limit, Limit::lifetime(U256::exp10(18)));
        assert_eq!(config.call_policies[0].value_limit, Limit::zero());
        assert_eq!(config.call_policies[0].constraints[0].condition, ConstraintCondition::LessOrEqual);
        assert!(config.transfer_policies.is_empty());
    }
}
