//! Tagged value tree for requests sent over the remote channel.
//!
//! Integers are carried as [`Value::Int`] until the request leaves the
//! process; [`Value::coerce_integers`] then rewrites every one of them as a
//! `0x` quantity string, which is what the remote wallet expects. Negative
//! integers have no quantity form and stay JSON integers.

use agw_transaction::{Quantity, TransactionRequest};
use agw_types::U256;
use serde_json::Number;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(U256),
    NegInt(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// `0x`-prefixed minimal hex quantity; zero is `0x0`.
pub fn hex_quantity(value: U256) -> String {
    if value.is_zero() {
        "0x0".to_string()
    } else {
        format!("0x{:x}", value)
    }
}

impl Value {
    /// Replace every integer leaf, at any depth, with its hex quantity
    /// string. Other leaves are left untouched.
    pub fn coerce_integers(self) -> Value {
        match self {
            Value::Int(value) => Value::Str(hex_quantity(value)),
            Value::List(items) => Value::List(items.into_iter().map(Value::coerce_integers).collect()),
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.coerce_integers()))
                    .collect(),
            ),
            other => other,
        }
    }
    
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(value) if value <= U256::from(u64::MAX) => {
                serde_json::Value::Number(Number::from(value.low_u64()))
            }
            Value::Int(value) => serde_json::Value::String(hex_quantity(value)),
            Value::NegInt(value) => serde_json::Value::Number(Number::from(value)),
            Value::Float(f) => Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s),
            Value::List(items) => serde_json::Value::Array(items.into_iter().map(Value::into_json).collect()),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_u64(), n.as_i64()) {
                (Some(u), _) => Value::Int(U256::from(u)),
                (None, Some(i)) => Value::NegInt(i),
                (None, None) => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(entries) => {
                Value::Map(entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&TransactionRequest> for Value {
    fn from(request: &TransactionRequest) -> Self {
        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };
        let hex = |bytes: &agw_types::Bytes| Value::Str(format!("{:x}", bytes));
        
        put("type", request.tx_type.map(|t| Value::Str(tx_type_name(t).to_string())));
        put("from", request.from.map(|a| Value::Str(format!("{:x}", a))));
        put("to", request.to.map(|a| Value::Str(format!("{:x}", a))));
        put("value", request.value.map(Value::Int));
        put("data", request.data.as_ref().map(hex));
        put("gas", request.gas.map(Value::Int));
        put("gasPrice", request.gas_price.map(Value::Int));
        put("maxFeePerGas", request.max_fee_per_gas.map(Value::Int));
        put("maxPriorityFeePerGas", request.max_priority_fee_per_gas.map(Value::Int));
        put("nonce", request.nonce.map(|n| Value::Int(U256::from(n))));
        put("chainId", request.chain_id.map(|c| Value::Int(U256::from(c))));
        put("customSignature", request.custom_signature.as_ref().map(hex));
        put("paymaster", request.paymaster.map(|a| Value::Str(format!("{:x}", a))));
        put("paymasterInput", request.paymaster_input.as_ref().map(hex));
        put(
            "gasPerPubdata",
            request.gas_per_pubdata.map(|q| match q {
                Quantity::Integer(value) => Value::Int(value),
                Quantity::Float(value) => Value::Float(value),
            }),
        );
        put(
            "factoryDeps",
            request
                .factory_deps
                .as_ref()
                .map(|deps| Value::List(deps.iter().map(hex).collect())),
        );
        Value::Map(map)
    }
}

fn tx_type_name(tx_type: agw_transaction::TxType) -> &'static str {
    use agw_transaction::TxType;
    match tx_type {
        TxType::Legacy => "legacy",
        TxType::Eip2930 => "eip2930",
        TxType::Eip1559 => "eip1559",
        TxType::Eip712 => "eip712",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agw_types::Address;
    use serde_json::json;
    
    #[test]
    fn test_coerce_flat() {
        let value = Value::from(json!({ "a": 255 })).coerce_integers();
        assert_eq!(value.into_json(), json!({ "a": "0xff" }));
    }
    
    #[test]
    fn test_coerce_nested() {
        let value = Value::from(json!({
            "outer": { "inner": [0, 16, { "deep": 4096 }] },
            "name": "session",
            "flag": true,
            "ratio": 1.5,
            "none": null
        }))
        .coerce_integers();
        
        assert_eq!(
            value.into_json(),
            json!({
                "outer": { "inner": ["0x0", "0x10", { "deep": "0x1000" }] },
                "name": "session",
                "flag": true,
                "ratio": 1.5,
                "none": null
            })
        );
    }
    
    #[test]
    fn test_negative_integers_stay_integers() {
        let value = Value::from(json!({ "delta": -5, "ratio": -0.5 }));
        assert_eq!(
            value,
            Value::Map(BTreeMap::from([
                ("delta".to_string(), Value::NegInt(-5)),
                ("ratio".to_string(), Value::Float(-0.5)),
            ]))
        );
        
        let json = value.coerce_integers().into_json();
        assert_eq!(json, json!({ "delta": -5, "ratio": -0.5 }));
        assert!(json["delta"].is_i64());
        assert_eq!(json["delta"].to_string(), "-5");
    }
    
    #[test]
    fn test_large_integers() {
        let value = Value::Int(U256::MAX).coerce_integers();
        assert_eq!(value, Value::Str(format!("0x{}", "f".repeat(64))));
    }
    
    #[test]
    fn test_request_tree() {
        let mut request = TransactionRequest::new()
            .to(Address::from_bytes([0x22; 20]))
            .value(U256::from(255u8))
            .data(vec![0xa9, 0x05, 0x9c, 0xbb]);
        request.nonce = Some(0);
        request.gas_per_pubdata = Some(Quantity::Float(800.0));
        
        let json = Value::from(&request).coerce_integers().into_json();
        assert_eq!(json["value"], "0xff");
        assert_eq!(json["nonce"], "0x0");
        assert_eq!(json["data"], "0xa9059cbb");
        assert_eq!(json["to"], "0x2222222222222222222222222222222222222222");
        assert_eq!(json["gasPerPubdata"], 800.0);
        assert!(json.get("paymaster").is_none());
    }
}
