use crate::chain::ChainConfig;
use crate::eip712::{assert_request, Eip712Transaction};
use crate::request::{Quantity, TransactionRequest};
use crate::{Result, TransactionError};
use agw_types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gas per pubdata byte used when neither the request nor the estimate
/// provides one.
pub const DEFAULT_GAS_PER_PUBDATA: u64 = 50_000;

/// Fee estimate reported by the node for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub gas_limit: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    #[serde(default)]
    pub gas_per_pubdata_limit: Option<U256>,
}

/// Complete `request` into a transaction sent from `from`.
///
/// Values on the request take precedence; `nonce` and `fees` fill the gaps.
/// A `gasPrice` without EIP-1559 fields is used as both fee caps.
pub fn fill_transaction(
    request: &TransactionRequest,
    from: Address,
    nonce: u64,
    fees: &FeeEstimate,
    chain: &ChainConfig,
) -> Result<Eip712Transaction> {
    assert_request(request)?;
    
    let chain_id = request.chain_id.unwrap_or(chain.chain_id);
    if chain_id != chain.chain_id {
        return Err(TransactionError::InvalidChainId(chain_id));
    }
    let to = request.to.ok_or(TransactionError::MissingField("to"))?;
    
    let (max_fee_per_gas, max_priority_fee_per_gas) = match request.gas_price {
        Some(gas_price) => (gas_price, gas_price),
        None => (
            request.max_fee_per_gas.unwrap_or(fees.max_fee_per_gas),
            request
                .max_priority_fee_per_gas
                .unwrap_or(fees.max_priority_fee_per_gas),
        ),
    };
    if max_priority_fee_per_gas > max_fee_per_gas {
        return Err(TransactionError::TipAboveFeeCap {
            max_priority_fee_per_gas,
            max_fee_per_gas,
        });
    }
    
    let gas_per_pubdata = match request.gas_per_pubdata {
        Some(quantity) => quantity.to_u256().ok_or_else(|| TransactionError::InvalidQuantity {
            field: "gasPerPubdata",
            value: match quantity {
                Quantity::Float(value) => value.to_string(),
                Quantity::Integer(value) => value.to_string(),
            },
        })?,
        None => fees
            .gas_per_pubdata_limit
            .unwrap_or_else(|| U256::from(chain.default_gas_per_pubdata)),
    };
    
    let tx = Eip712Transaction {
        chain_id,
        nonce: request.nonce.unwrap_or(nonce),
        from: request.from.unwrap_or(from),
        to,
        gas_limit: request.gas.unwrap_or(fees.gas_limit),
        gas_per_pubdata,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        value: request.value.unwrap_or_default(),
        data: request.data.clone().unwrap_or_default(),
        factory_deps: request.factory_deps.clone().unwrap_or_default(),
        paymaster: request.paymaster,
        paymaster_input: request.paymaster_input.clone().unwrap_or_default(),
        custom_signature: request.custom_signature.clone().unwrap_or_else(Bytes::new),
    };
    
    debug!(
        chain_id,
        nonce = tx.nonce,
        to = %tx.to,
        gas_limit = %tx.gas_limit,
        "Filled EIP-712 transaction"
    );
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::TxType;
    
    fn fees() -> FeeEstimate {
        FeeEstimate {
            gas_limit: U256::from(300_000u64),
            max_fee_per_gas: U256::from(25_000_000u64),
            max_priority_fee_per_gas: U256::zero(),
            gas_per_pubdata_limit: None,
        }
    }
    
    #[test]
    fn test_fill_defaults() {
        let chain = ChainConfig::abstract_testnet();
        let request = TransactionRequest::new()
            .to(Address::from_bytes([0x22; 20]))
            .tx_type(TxType::Eip712);
        let tx = fill_transaction(&request, Address::from_bytes([0xaa; 20]), 3, &fees(), &chain).unwrap();
        
        assert_eq!(tx.chain_id, 11124);
        assert_eq!(tx.nonce, 3);
        assert_eq!(tx.from, Address::from_bytes([0xaa; 20]));
        assert_eq!(tx.gas_limit, U256::from(300_000u64));
        assert_eq!(tx.gas_per_pubdata, U256::from(DEFAULT_GAS_PER_PUBDATA));
        assert!(tx.paymaster.is_none());
    }
    
    #[test]
    fn test_request_values_win() {
        let chain = ChainConfig::abstract_testnet();
        let mut request = TransactionRequest::new().to(Address::from_bytes([0x22; 20]));
        request.nonce = Some(9);
        request.gas = Some(U256::from(21_000u64));
        request.gas_per_pubdata = Some(Quantity::Float(800.0));
        request.gas_price = Some(U256::from(7u8));
        
        let tx = fill_transaction(&request, Address::zero(), 3, &fees(), &chain).unwrap();
        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.gas_limit, U256::from(21_000u64));
        assert_eq!(tx.gas_per_pubdata, U256::from(800u64));
        assert_eq!(tx.max_fee_per_gas, U256::from(7u8));
        assert_eq!(tx.max_priority_fee_per_gas, U256::from(7u8));
    }
    
    #[test]
    fn test_missing_to() {
        let chain = ChainConfig::abstract_testnet();
        let result = fill_transaction(&TransactionRequest::new(), Address::zero(), 0, &fees(), &chain);
        assert!(matches!(result, Err(TransactionError::MissingField("to"))));
    }
    
    #[test]
    fn test_chain_mismatch() {
        let chain = ChainConfig::abstract_testnet();
        let request = TransactionRequest::new().to(Address::zero()).chain_id(1);
        let result = fill_transaction(&request, Address::zero(), 0, &fees(), &chain);
        assert!(matches!(result, Err(TransactionError::InvalidChainId(1))));
    }
    
    #[test]
    fn test_estimated_tip_above_request_cap() {
        let chain = ChainConfig::abstract_testnet();
        let mut request = TransactionRequest::new().to(Address::zero());
        request.max_fee_per_gas = Some(U256::from(1u8));
        let mut fees = fees();
        fees.max_priority_fee_per_gas = U256::from(2u8);
        let result = fill_transaction(&request, Address::zero(), 0, &fees, &chain);
        assert!(matches!(result, Err(TransactionError::TipAboveFeeCap { .. })));
    }
}
