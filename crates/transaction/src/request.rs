use agw_types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Transaction envelope requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Legacy,
    Eip2930,
    Eip1559,
    Eip712,
}

/// A numeric field as the caller supplied it.
///
/// `Float` is an untyped number that was never converted to an integer
/// quantity; it still carries a value but does not mark a request as
/// EIP-712 on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Integer(U256),
    Float(f64),
}

impl Quantity {
    /// Integer value, if the quantity has one.
    pub fn to_u256(&self) -> Option<U256> {
        match *self {
            Quantity::Integer(value) => Some(value),
            Quantity::Float(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
                Some(U256::from(value as u64))
            }
            Quantity::Float(_) => None,
        }
    }
}

impl From<U256> for Quantity {
    fn from(value: U256) -> Self {
        Quantity::Integer(value)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Quantity::Integer(U256::from(value))
    }
}

/// Partially specified transaction, as accepted by the signing and sending
/// actions. Every field is optional until the transaction is filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<TxType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_signature: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster_input: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_per_pubdata: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_deps: Option<Vec<Bytes>>,
}

impl TransactionRequest {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }
    
    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }
    
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }
    
    pub fn tx_type(mut self, tx_type: TxType) -> Self {
        self.tx_type = Some(tx_type);
        self
    }
    
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
    
    pub fn paymaster(mut self, paymaster: Address, input: impl Into<Bytes>) -> Self {
        self.paymaster = Some(paymaster);
        self.paymaster_input = Some(input.into());
        self
    }
    
    /// Calldata, or empty for a plain transfer.
    pub fn calldata(&self) -> &[u8] {
        self.data.as_ref().map(Bytes::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_quantity_json() {
        let integer: Quantity = serde_json::from_str("\"0xc350\"").unwrap();
        assert_eq!(integer, Quantity::Integer(U256::from(50_000u64)));
        
        let float: Quantity = serde_json::from_str("50000").unwrap();
        assert_eq!(float, Quantity::Float(50_000.0));
        assert_eq!(float.to_u256(), Some(U256::from(50_000u64)));
        assert_eq!(Quantity::Float(1.5).to_u256(), None);
    }
    
    #[test]
    fn test_request_json_field_names() {
        let request = TransactionRequest::new()
            .to(Address::from_bytes([0x11; 20]))
            .tx_type(TxType::Eip712);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "eip712");
        assert_eq!(json["to"], "0x1111111111111111111111111111111111111111");
        assert!(json.get("gasPerPubdata").is_none());
        
        let parsed: TransactionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, request);
    }
}
