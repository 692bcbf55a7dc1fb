//! Canonical ABI encoding of session configurations.
//!
//! The layout matches the `SessionSpec` struct of the session-key validator:
//!
//! ```text
//! (address signer, uint256 expiresAt, UsageLimit feeLimit,
//!  CallSpec[] callPolicies, TransferSpec[] transferPolicies)
//! ```
//!
//! The session hash is the keccak-256 of this encoding, so any change here
//! changes every session's identity.

use crate::contracts::{self, SessionSpec, UsageLimit};
use crate::policy::{
    CallPolicy, Constraint, ConstraintCondition, Limit, LimitType, SessionConfig, TransferPolicy,
};
use crate::{EncodingError, Result, SessionError};
use agw_crypto::keccak256;
use agw_types::{Address, AlloyCompat, Bytes, H256, U256};
use alloy_primitives::FixedBytes;
use alloy_sol_types::SolValue;
use tracing::debug;

const SESSION_SPEC_SIGNATURE: &str = "(address,uint256,(uint8,uint256,uint256),\
(address,bytes4,uint256,(uint8,uint256,uint256),(uint8,uint64,bytes32,(uint8,uint256,uint256))[])[],\
(address,uint256,(uint8,uint256,uint256))[])";

/// Canonical Solidity type string of `SessionSpec`, as used in function
/// signatures such as `createSession(...)`.
pub fn session_spec_signature() -> &'static str {
    SESSION_SPEC_SIGNATURE
}

fn usage_limit(limit: &Limit) -> UsageLimit {
    let limit = limit.canonical();
    UsageLimit {
        limitType: limit.limit_type as u8,
        limit: limit.limit.to_alloy(),
        period: limit.period.to_alloy(),
    }
}

fn limit_from(spec: UsageLimit) -> Result<Limit> {
    let limit_type = LimitType::from_u8(spec.limitType)
        .ok_or_else(|| SessionError::InvalidField(format!("limit type {}", spec.limitType)))?;
    Ok(Limit {
        limit_type,
        limit: U256::from_alloy(spec.limit),
        period: U256::from_alloy(spec.period),
    })
}

fn call_spec(index: usize, policy: &CallPolicy) -> std::result::Result<contracts::CallSpec, EncodingError> {
    let selector = FixedBytes::<4>::try_from(policy.selector.as_slice()).map_err(|_| {
        EncodingError::InvalidSelector {
            index,
            actual: policy.selector.len(),
        }
    })?;
    Ok(contracts::CallSpec {
        target: policy.target.to_alloy(),
        selector,
        maxValuePerUse: policy.max_value_per_use.to_alloy(),
        valueLimit: usage_limit(&policy.value_limit),
        constraints: policy
            .constraints
            .iter()
            .map(|constraint| contracts::Constraint {
                condition: constraint.condition as u8,
                index: constraint.index,
                refValue: constraint.ref_value.to_alloy(),
                limit: usage_limit(&constraint.limit),
            })
            .collect(),
    })
}

fn transfer_spec(policy: &TransferPolicy) -> contracts::TransferSpec {
    contracts::TransferSpec {
        target: policy.target.to_alloy(),
        maxValuePerUse: policy.max_value_per_use.to_alloy(),
        valueLimit: usage_limit(&policy.value_limit),
    }
}

/// The validator's `SessionSpec` for a session. Limits are canonicalized
/// and every call selector must be exactly 4 bytes.
pub fn to_session_spec(config: &SessionConfig) -> std::result::Result<SessionSpec, EncodingError> {
    let call_policies = config
        .call_policies
        .iter()
        .enumerate()
        .map(|(index, policy)| call_spec(index, policy))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    
    Ok(SessionSpec {
        signer: config.signer.to_alloy(),
        expiresAt: U256::from(config.expires_at).to_alloy(),
        feeLimit: usage_limit(&config.fee_limit),
        callPolicies: call_policies,
        transferPolicies: config.transfer_policies.iter().map(transfer_spec).collect(),
    })
}

fn constraint_from(spec: contracts::Constraint) -> Result<Constraint> {
    let condition = ConstraintCondition::from_u8(spec.condition)
        .ok_or_else(|| SessionError::InvalidField(format!("constraint condition {}", spec.condition)))?;
    Ok(Constraint {
        condition,
        index: spec.index,
        ref_value: H256::from_alloy(spec.refValue),
        limit: limit_from(spec.limit)?,
    })
}

/// Inverse of [`to_session_spec`].
pub fn from_session_spec(spec: SessionSpec) -> Result<SessionConfig> {
    let expires_at = U256::from_alloy(spec.expiresAt);
    if expires_at > U256::from(u64::MAX) {
        return Err(SessionError::InvalidField(format!("expiresAt {}", expires_at)));
    }
    
    let call_policies = spec
        .callPolicies
        .into_iter()
        .map(|call| -> Result<CallPolicy> {
            Ok(CallPolicy {
                target: Address::from_alloy(call.target),
                selector: Bytes::from_slice(call.selector.as_slice()),
                max_value_per_use: U256::from_alloy(call.maxValuePerUse),
                value_limit: limit_from(call.valueLimit)?,
                constraints: call
                    .constraints
                    .into_iter()
                    .map(constraint_from)
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    
    let transfer_policies = spec
        .transferPolicies
        .into_iter()
        .map(|transfer| -> Result<TransferPolicy> {
            Ok(TransferPolicy {
                target: Address::from_alloy(transfer.target),
                max_value_per_use: U256::from_alloy(transfer.maxValuePerUse),
                value_limit: limit_from(transfer.valueLimit)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    
    Ok(SessionConfig {
        signer: Address::from_alloy(spec.signer),
        expires_at: expires_at.as_u64(),
        fee_limit: limit_from(spec.feeLimit)?,
        call_policies,
        transfer_policies,
    })
}

/// ABI-encode a session as the single `SessionSpec` tuple parameter.
pub fn encode_session(config: &SessionConfig) -> Result<Bytes> {
    let encoded = to_session_spec(config)?.abi_encode();
    debug!(
        signer = %config.signer,
        call_policies = config.call_policies.len(),
        transfer_policies = config.transfer_policies.len(),
        len = encoded.len(),
        "Encoded session"
    );
    Ok(Bytes::from_vec(encoded))
}

/// Session identity: keccak-256 of [`encode_session`].
pub fn get_session_hash(config: &SessionConfig) -> Result<H256> {
    let encoded = encode_session(config)?;
    Ok(keccak256(&encoded))
}

/// Inverse of [`encode_session`].
pub fn decode_session(data: &[u8]) -> Result<SessionConfig> {
    let spec = SessionSpec::abi_decode(data, true)?;
    from_session_spec(spec)
}

/// Validation-hook payload for the session validator: `abi.encode(SessionSpec,
/// uint64[] periodIds)`.
pub fn encode_session_with_period_ids(config: &SessionConfig, period_ids: &[u64]) -> Result<Bytes> {
    let spec = to_session_spec(config)?;
    let encoded = (spec, period_ids.to_vec()).abi_encode_params();
    Ok(Bytes::from_vec(encoded))
}
