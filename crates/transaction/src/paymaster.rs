//! Paymaster parameters and injection.

use crate::request::TransactionRequest;
use crate::{Result, TransactionError};
use agw_types::{Address, AlloyCompat, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

sol! {
    interface IPaymasterFlow {
        function general(bytes calldata input) external;
        function approvalBased(address token, uint256 minAllowance, bytes calldata innerInput) external;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterParams {
    pub paymaster: Address,
    pub paymaster_input: Bytes,
}

/// Source of paymaster sponsorship for requests that do not name one.
#[async_trait]
pub trait PaymasterHandler: Send + Sync {
    /// Parameters to attach, or `None` to leave the request unsponsored.
    async fn paymaster_params(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<Option<PaymasterParams>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Input for a paymaster that sponsors unconditionally: `general(bytes)`.
pub fn general_paymaster_input(inner: &[u8]) -> Bytes {
    let call = IPaymasterFlow::generalCall {
        input: Bytes::from_slice(inner).to_alloy(),
    };
    Bytes::from_vec(call.abi_encode())
}

/// Input for a paymaster paid in an ERC-20 token:
/// `approvalBased(address,uint256,bytes)`.
pub fn approval_based_paymaster_input(token: Address, min_allowance: U256, inner: &[u8]) -> Bytes {
    let call = IPaymasterFlow::approvalBasedCall {
        token: token.to_alloy(),
        minAllowance: min_allowance.to_alloy(),
        innerInput: Bytes::from_slice(inner).to_alloy(),
    };
    Bytes::from_vec(call.abi_encode())
}

/// Attach paymaster parameters to `request`.
///
/// A paymaster named on the request is kept as is. Otherwise `handler`, if
/// any, is consulted.
pub async fn apply_paymaster(
    request: &mut TransactionRequest,
    handler: Option<&dyn PaymasterHandler>,
) -> Result<()> {
    if request.paymaster.is_some() {
        if request.paymaster_input.is_none() {
            return Err(TransactionError::MissingField("paymasterInput"));
        }
        return Ok(());
    }
    
    let Some(handler) = handler else {
        return Ok(());
    };
    
    let params = handler
        .paymaster_params(request)
        .await
        .map_err(|e| TransactionError::Paymaster(e.to_string()))?;
    
    if let Some(params) = params {
        debug!(paymaster = %params.paymaster, "Injecting paymaster");
        request.paymaster = Some(params.paymaster);
        request.paymaster_input = Some(params.paymaster_input);
    }
    Ok(())
}
