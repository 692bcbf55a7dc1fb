//! EIP-712 typed data payloads.

use crate::{Result, EIP712_TX_TYPE};
use agw_types::{AlloyCompat, H256, U256};
pub use alloy_dyn_abi::TypedData;
use serde_json::Value;

pub const ZKSYNC_DOMAIN_NAME: &str = "zkSync";

/// `keccak256(0x1901 || domainSeparator || hashStruct(message))`.
pub fn typed_data_signing_hash(data: &TypedData) -> Result<H256> {
    Ok(H256::from_alloy(data.eip712_signing_hash()?))
}

/// Whether `data` is a zkSync transaction, which the account validates
/// natively and must be signed without a validator wrapper.
pub fn is_zksync_transaction(data: &TypedData) -> bool {
    data.domain.name.as_deref() == Some(ZKSYNC_DOMAIN_NAME)
        && data.primary_type == "Transaction"
        && data
            .message
            .get("txType")
            .and_then(parse_uint)
            .map_or(false, |tx_type| tx_type == U256::from(EIP712_TX_TYPE))
}

/// JSON quantities arrive as numbers, decimal strings or hex strings.
fn parse_uint(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => U256::from_str_radix(hex, 16).ok(),
            None => U256::from_dec_str(s).ok(),
        },
        _ => None,
    }
}
