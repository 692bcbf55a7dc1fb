//! Solidity bindings for the session-key validator.

use crate::codec::to_session_spec;
use crate::policy::SessionConfig;
use crate::Result;
use agw_types::{AlloyCompat, Bytes, H256};
use alloy_sol_types::{sol, SolCall};

sol! {
    struct UsageLimit {
        uint8 limitType;
        uint256 limit;
        uint256 period;
    }
    
    struct Constraint {
        uint8 condition;
        uint64 index;
        bytes32 refValue;
        UsageLimit limit;
    }
    
    struct CallSpec {
        address target;
        bytes4 selector;
        uint256 maxValuePerUse;
        UsageLimit valueLimit;
        Constraint[] constraints;
    }
    
    struct TransferSpec {
        address target;
        uint256 maxValuePerUse;
        UsageLimit valueLimit;
    }
    
    struct SessionSpec {
        address signer;
        uint256 expiresAt;
        UsageLimit feeLimit;
        CallSpec[] callPolicies;
        TransferSpec[] transferPolicies;
    }
    
    interface ISessionKeyValidator {
        function sessionStatus(address account, bytes32 sessionHash) external view returns (uint8 status);
        function createSession(SessionSpec memory sessionSpec) external;
        function revokeKeys(bytes32[] calldata sessionHashes) external;
    }
}

/// Calldata for `createSession(SessionSpec)`.
pub fn create_session_calldata(config: &SessionConfig) -> Result<Bytes> {
    let call = ISessionKeyValidator::createSessionCall {
        sessionSpec: to_session_spec(config)?,
    };
    Ok(Bytes::from_vec(call.abi_encode()))
}

/// Calldata for `revokeKeys(bytes32[])`.
pub fn revoke_keys_calldata(session_hashes: &[H256]) -> Bytes {
    let call = ISessionKeyValidator::revokeKeysCall {
        sessionHashes: session_hashes.iter().map(AlloyCompat::to_alloy).collect(),
    };
    Bytes::from_vec(call.abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_session, session_spec_signature};
    use crate::policy::Limit;
    use agw_types::{Address, U256};
    
    #[test]
    fn test_create_session_signature() {
        assert_eq!(
            ISessionKeyValidator::createSessionCall::SIGNATURE,
            format!("createSession({})", session_spec_signature())
        );
    }
    
    #[test]
    fn test_create_session_calldata() {
        let config = SessionConfig::new(Address::from_bytes([0x11; 20]), 100, Limit::lifetime(U256::from(7u8)));
        let data = create_session_calldata(&config).unwrap();
        
        assert_eq!(&data[..4], &ISessionKeyValidator::createSessionCall::SELECTOR[..]);
        assert_eq!(&data[4..], encode_session(&config).unwrap().as_slice());
    }
    
    #[test]
    fn test_revoke_keys_calldata() {
        let hashes = [H256::repeat_byte(0x01), H256::repeat_byte(0x02)];
        let data = revoke_keys_calldata(&hashes);
        
        let decoded = ISessionKeyValidator::revokeKeysCall::abi_decode(&data, true).unwrap();
        let decoded: Vec<H256> = decoded.sessionHashes.into_iter().map(H256::from_alloy).collect();
        assert_eq!(decoded, hashes);
        // selector + offset + length + two words
        assert_eq!(data.len(), 4 + 32 * 4);
    }
}
