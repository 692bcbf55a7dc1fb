//! zkSync EIP-712 transactions (type `0x71`).

use crate::deploy::hash_bytecode;
use crate::request::{Quantity, TransactionRequest, TxType};
use crate::typed_data::{TypedData, ZKSYNC_DOMAIN_NAME};
use crate::{Result, TransactionError};
use agw_crypto::keccak256;
use agw_rlp::Encoder;
use agw_types::{Address, AlloyCompat, Bytes, H256, U256};
use alloy_sol_types::{sol, Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const EIP712_TX_TYPE: u8 = 0x71;

const DOMAIN_VERSION: &str = "2";

sol! {
    /// The struct the account owner signs. Addresses are widened to
    /// `uint256`.
    #[derive(Serialize)]
    struct Transaction {
        uint256 txType;
        uint256 from;
        uint256 to;
        uint256 gasLimit;
        uint256 gasPerPubdataByteLimit;
        uint256 maxFeePerGas;
        uint256 maxPriorityFeePerGas;
        uint256 paymaster;
        uint256 nonce;
        uint256 value;
        bytes data;
        bytes32[] factoryDeps;
        bytes paymasterInput;
    }
}

fn address_word(address: Address) -> alloy_primitives::U256 {
    U256::from_big_endian(address.as_bytes()).to_alloy()
}

/// Whether a request has to be sent as an EIP-712 transaction.
///
/// Any zkSync-specific field marks it as such. `factoryDeps` counts even when
/// empty. `gasPerPubdata` only counts as an integer quantity.
pub fn is_eip712_transaction(tx: &TransactionRequest) -> bool {
    if tx.tx_type == Some(TxType::Eip712) {
        return true;
    }
    let non_empty = |bytes: &Option<Bytes>| bytes.as_ref().map_or(false, |b| !b.is_empty());
    
    non_empty(&tx.custom_signature)
        || tx.paymaster.is_some()
        || non_empty(&tx.paymaster_input)
        || tx.factory_deps.is_some()
        || matches!(tx.gas_per_pubdata, Some(Quantity::Integer(_)))
}

/// Field consistency checks that apply to any transaction request.
pub fn assert_request(tx: &TransactionRequest) -> Result<()> {
    if let Some(chain_id) = tx.chain_id {
        if chain_id == 0 {
            return Err(TransactionError::InvalidChainId(chain_id));
        }
    }
    if tx.gas_price.is_some() && (tx.max_fee_per_gas.is_some() || tx.max_priority_fee_per_gas.is_some()) {
        return Err(TransactionError::FeeConflict);
    }
    if let (Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) =
        (tx.max_fee_per_gas, tx.max_priority_fee_per_gas)
    {
        if max_priority_fee_per_gas > max_fee_per_gas {
            return Err(TransactionError::TipAboveFeeCap {
                max_priority_fee_per_gas,
                max_fee_per_gas,
            });
        }
    }
    Ok(())
}

/// Reject requests that are not EIP-712, then apply [`assert_request`].
pub fn assert_eip712_request(tx: &TransactionRequest) -> Result<()> {
    if !is_eip712_transaction(tx) {
        return Err(TransactionError::InvalidTransactionType);
    }
    assert_request(tx)
}

/// Fully populated EIP-712 transaction, ready to hash and serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub from: Address,
    pub to: Address,
    pub gas_limit: U256,
    pub gas_per_pubdata: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub value: U256,
    pub data: Bytes,
    pub factory_deps: Vec<Bytes>,
    pub paymaster: Option<Address>,
    pub paymaster_input: Bytes,
    /// Account-level signature; empty until signed.
    pub custom_signature: Bytes,
}

impl Eip712Transaction {
    pub fn domain(&self) -> Eip712Domain {
        Eip712Domain {
            name: Some(Cow::Borrowed(ZKSYNC_DOMAIN_NAME)),
            version: Some(Cow::Borrowed(DOMAIN_VERSION)),
            chain_id: Some(U256::from(self.chain_id).to_alloy()),
            ..Default::default()
        }
    }
    
    /// The signed `Transaction` struct. Factory dependencies are replaced
    /// by their bytecode hashes.
    pub fn eip712_struct(&self) -> Result<Transaction> {
        let factory_deps = self
            .factory_deps
            .iter()
            .map(|dep| hash_bytecode(dep).map(|hash| hash.to_alloy()))
            .collect::<Result<Vec<_>>>()?;
        
        Ok(Transaction {
            txType: U256::from(EIP712_TX_TYPE).to_alloy(),
            from: address_word(self.from),
            to: address_word(self.to),
            gasLimit: self.gas_limit.to_alloy(),
            gasPerPubdataByteLimit: self.gas_per_pubdata.to_alloy(),
            maxFeePerGas: self.max_fee_per_gas.to_alloy(),
            maxPriorityFeePerGas: self.max_priority_fee_per_gas.to_alloy(),
            paymaster: address_word(self.paymaster.unwrap_or_default()),
            nonce: U256::from(self.nonce).to_alloy(),
            value: self.value.to_alloy(),
            data: self.data.to_alloy(),
            factoryDeps: factory_deps,
            paymasterInput: self.paymaster_input.to_alloy(),
        })
    }
    
    /// `hashStruct(Transaction)`.
    pub fn struct_hash(&self) -> Result<H256> {
        Ok(H256::from_alloy(self.eip712_struct()?.eip712_hash_struct()))
    }
    
    /// Digest the account owner (or session key) signs.
    pub fn signing_hash(&self) -> Result<H256> {
        let hash = self.eip712_struct()?.eip712_signing_hash(&self.domain());
        Ok(H256::from_alloy(hash))
    }
    
    /// The same transaction as an `eth_signTypedData_v4` payload.
    pub fn typed_data(&self) -> Result<TypedData> {
        Ok(TypedData::from_struct(&self.eip712_struct()?, Some(self.domain())))
    }
    
    pub fn with_custom_signature(mut self, signature: Bytes) -> Self {
        self.custom_signature = signature;
        self
    }
    
    /// Raw transaction bytes: `0x71 || rlp([...])`.
    pub fn serialize(&self) -> Bytes {
        let chain_id = agw_rlp::encode(&self.chain_id).into_vec();
        let empty = agw_rlp::encode(&Bytes::new()).into_vec();
        let paymaster_params = match self.paymaster {
            Some(paymaster) => {
                let mut encoder = Encoder::new();
                encoder.encode_raw_list(&[
                    agw_rlp::encode(&paymaster).into_vec(),
                    agw_rlp::encode(&self.paymaster_input).into_vec(),
                ]);
                encoder.finish()
            }
            None => {
                let mut encoder = Encoder::new();
                encoder.encode_raw_list(&[]);
                encoder.finish()
            }
        };
        
        let mut encoder = Encoder::new();
        encoder.encode_raw_list(&[
            agw_rlp::encode(&self.nonce).into_vec(),
            agw_rlp::encode(&self.max_priority_fee_per_gas).into_vec(),
            agw_rlp::encode(&self.max_fee_per_gas).into_vec(),
            agw_rlp::encode(&self.gas_limit).into_vec(),
            agw_rlp::encode(&self.to).into_vec(),
            agw_rlp::encode(&self.value).into_vec(),
            agw_rlp::encode(&self.data).into_vec(),
            chain_id.clone(),
            empty.clone(),
            empty,
            chain_id,
            agw_rlp::encode(&self.from).into_vec(),
            agw_rlp::encode(&self.gas_per_pubdata).into_vec(),
            agw_rlp::encode(&self.factory_deps).into_vec(),
            agw_rlp::encode(&self.custom_signature).into_vec(),
            paymaster_params,
        ]);
        
        let mut out = vec![EIP712_TX_TYPE];
        out.extend(encoder.finish());
        Bytes::from_vec(out)
    }
    
    /// Hash of the serialized transaction as returned by the node.
    pub fn hash(&self) -> H256 {
        keccak256(&self.serialize())
    }
}
