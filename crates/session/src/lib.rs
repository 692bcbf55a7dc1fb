//! Session keys for the Abstract Global Wallet.
//!
//! A session is a time- and policy-bounded delegation that lets a secondary
//! key act for the smart account. It has no identity besides the keccak-256
//! hash of its canonical ABI encoding, which is what the session-key
//! validator contract stores state under.

pub mod codec;
pub mod contracts;
pub mod period;
pub mod policy;
pub mod status;

pub use codec::{
    decode_session, encode_session, encode_session_with_period_ids, from_session_spec,
    get_session_hash, session_spec_signature, to_session_spec,
};
pub use contracts::{create_session_calldata, revoke_keys_calldata, SessionSpec};
pub use period::{period_ids_for_transaction, selector_of};
pub use policy::{
    CallPolicy, Constraint, ConstraintCondition, Limit, LimitType, SessionConfig, TransferPolicy,
};
pub use status::{get_session_status, resolve_status, BoxError, ContractReader, SessionStatus};

use agw_types::{Address, H256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed session fields found while encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Call policy {index}: selector must be 4 bytes, got {actual}")]
    InvalidSelector { index: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
    
    #[error("Decoding error: {0}")]
    Decoding(#[from] alloy_sol_types::Error),
    
    #[error("Invalid session field: {0}")]
    InvalidField(String),
    
    #[error("Contract read {function} on {address:x} with args [{args}] failed: {source}")]
    ContractRead {
        function: String,
        address: Address,
        args: String,
        #[source]
        source: BoxError,
    },
    
    #[error("Invalid session status value: {0}")]
    InvalidStatus(u8),
    
    #[error("Transaction does not fit any session policy")]
    NoMatchingPolicy,
    
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A session named either by its hash or by its full configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionOrHash {
    Hash(H256),
    Config(SessionConfig),
}

impl SessionOrHash {
    /// Hash of the session. Configurations go through the same codec path
    /// as session creation.
    pub fn session_hash(&self) -> Result<H256> {
        match self {
            SessionOrHash::Hash(hash) => Ok(*hash),
            SessionOrHash::Config(config) => get_session_hash(config),
        }
    }
    
    pub fn config(&self) -> Option<&SessionConfig> {
        match self {
            SessionOrHash::Hash(_) => None,
            SessionOrHash::Config(config) => Some(config),
        }
    }
}

impl From<H256> for SessionOrHash {
    fn from(hash: H256) -> Self {
        SessionOrHash::Hash(hash)
    }
}

impl From<SessionConfig> for SessionOrHash {
    fn from(config: SessionConfig) -> Self {
        SessionOrHash::Config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_session_or_hash_uses_codec_hash() {
        let config = SessionConfig::new(Address::from_bytes([0x42; 20]), 1_700_000_000, Limit::lifetime(1000u64.into()));
        let expected = get_session_hash(&config).unwrap();
        
        assert_eq!(SessionOrHash::from(config).session_hash().unwrap(), expected);
        assert_eq!(SessionOrHash::from(expected).session_hash().unwrap(), expected);
    }
    
    #[test]
    fn test_session_or_hash_json() {
        let hash = H256::repeat_byte(0xab);
        let json = serde_json::to_string(&SessionOrHash::Hash(hash)).unwrap();
        let parsed: SessionOrHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SessionOrHash::Hash(hash));
    }
}
