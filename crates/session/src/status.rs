//! Session status lookup against the session-key validator.

use crate::contracts::ISessionKeyValidator::sessionStatusCall;
use crate::policy::SessionConfig;
use crate::{Result, SessionError, SessionOrHash};
use agw_types::{Address, AlloyCompat, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only view calls against a chain.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// `eth_call` of `data` against `to` at the latest block.
    async fn call(&self, to: Address, data: Bytes) -> std::result::Result<Bytes, BoxError>;
}

/// Lifecycle state of a session as tracked by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum SessionStatus {
    NotInitialized = 0,
    Active = 1,
    Closed = 2,
    Expired = 3,
}

impl SessionStatus {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SessionStatus::NotInitialized),
            1 => Some(SessionStatus::Active),
            2 => Some(SessionStatus::Closed),
            3 => Some(SessionStatus::Expired),
            _ => None,
        }
    }
    
    /// Closed and expired sessions never become usable again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Closed | SessionStatus::Expired)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::NotInitialized => "not initialized",
            SessionStatus::Active => "active",
            SessionStatus::Closed => "closed",
            SessionStatus::Expired => "expired",
        };
        write!(f, "{}", name)
    }
}

/// Interpret the validator's raw status.
///
/// The chain value is returned as is, except that an `Active` session whose
/// configuration is known and whose expiry has passed is reported as
/// `Expired`.
pub fn resolve_status(raw: u8, config: Option<&SessionConfig>, now: u64) -> Result<SessionStatus> {
    let status = SessionStatus::from_u8(raw).ok_or(SessionError::InvalidStatus(raw))?;
    match (status, config) {
        (SessionStatus::Active, Some(config)) if config.is_expired_at(now) => Ok(SessionStatus::Expired),
        _ => Ok(status),
    }
}

/// Fetch the status of a session for `account` from the session-key
/// validator at `validator`. Never cached.
pub async fn get_session_status<R>(
    reader: &R,
    validator: Address,
    account: Address,
    session: &SessionOrHash,
) -> Result<SessionStatus>
where
    R: ContractReader + ?Sized,
{
    let hash = session.session_hash()?;
    let call = sessionStatusCall {
        account: account.to_alloy(),
        sessionHash: hash.to_alloy(),
    };
    
    let read_error = |source: BoxError| SessionError::ContractRead {
        function: "sessionStatus".to_string(),
        address: validator,
        args: format!("{:x}, {:?}", account, hash),
        source,
    };
    
    let output = reader
        .call(validator, Bytes::from_vec(call.abi_encode()))
        .await
        .map_err(read_error)?;
    let raw = sessionStatusCall::abi_decode_returns(&output, true)
        .map_err(|e| read_error(Box::new(e)))?
        .status;
    
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let status = resolve_status(raw, session.config(), now)?;
    debug!(account = %account, session = ?hash, raw, %status, "Resolved session status");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Limit;
    use agw_types::{UintExt, H256, U256};
    use std::collections::HashMap;
    use std::sync::Mutex;
    
    /// Validator stand-in keyed by `(account, session hash)`.
    #[derive(Default)]
    struct MockValidator {
        statuses: Mutex<HashMap<(Address, H256), u8>>,
        fail: bool,
    }
    
    impl MockValidator {
        fn set(&self, account: Address, hash: H256, status: SessionStatus) {
            self.statuses.lock().unwrap().insert((account, hash), status as u8);
        }
    }
    
    #[async_trait]
    impl ContractReader for MockValidator {
        async fn call(&self, _to: Address, data: Bytes) -> std::result::Result<Bytes, BoxError> {
            if self.fail {
                return Err("connection refused".into());
            }
            let call = sessionStatusCall::abi_decode(&data, true)?;
            let account = Address::from_alloy(call.account);
            let hash = H256::from_alloy(call.sessionHash);
            let status = self
                .statuses
                .lock()
                .unwrap()
                .get(&(account, hash))
                .copied()
                .unwrap_or(0);
            Ok(Bytes::from(U256::from(status).to_word()))
        }
    }
    
    fn session() -> SessionConfig {
        SessionConfig::new(Address::from_bytes([0x55; 20]), 0, Limit::lifetime(U256::from(1000u64)))
    }
    
    #[tokio::test]
    async fn test_status_lifecycle() {
        let validator = MockValidator::default();
        let validator_address = Address::from_bytes([0x34; 20]);
        let account = Address::from_bytes([0xaa; 20]);
        let session = SessionOrHash::from(session());
        let hash = session.session_hash().unwrap();
        
        let status = get_session_status(&validator, validator_address, account, &session).await.unwrap();
        assert_eq!(status, SessionStatus::NotInitialized);
        
        validator.set(account, hash, SessionStatus::Active);
        let status = get_session_status(&validator, validator_address, account, &session).await.unwrap();
        assert_eq!(status, SessionStatus::Active);
        
        validator.set(account, hash, SessionStatus::Closed);
        let by_hash = SessionOrHash::from(hash);
        let status = get_session_status(&validator, validator_address, account, &by_hash).await.unwrap();
        assert_eq!(status, SessionStatus::Closed);
        assert!(status.is_terminal());
    }
    
    #[tokio::test]
    async fn test_read_failure_is_decorated() {
        let validator = MockValidator {
            fail: true,
            ..Default::default()
        };
        let err = get_session_status(
            &validator,
            Address::from_bytes([0x34; 20]),
            Address::from_bytes([0xaa; 20]),
            &SessionOrHash::from(H256::repeat_byte(7)),
        )
        .await
        .unwrap_err();
        
        match err {
            SessionError::ContractRead { function, address, args, .. } => {
                assert_eq!(function, "sessionStatus");
                assert_eq!(address, Address::from_bytes([0x34; 20]));
                assert!(args.contains("0xaaaaaaaa"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
    
    #[test]
    fn test_resolve_status() {
        let mut config = session();
        config.expires_at = 1000;
        
        assert_eq!(resolve_status(1, Some(&config), 999).unwrap(), SessionStatus::Active);
        assert_eq!(resolve_status(1, Some(&config), 1000).unwrap(), SessionStatus::Expired);
        assert_eq!(resolve_status(1, None, 5000).unwrap(), SessionStatus::Active);
        assert_eq!(resolve_status(2, Some(&config), 5000).unwrap(), SessionStatus::Closed);
        assert_eq!(resolve_status(3, None, 0).unwrap(), SessionStatus::Expired);
        assert!(matches!(resolve_status(4, None, 0), Err(SessionError::InvalidStatus(4))));
    }
}
