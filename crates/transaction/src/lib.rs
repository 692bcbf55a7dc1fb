//! Transaction assembly for zkSync-style EIP-712 (type `0x71`) transactions
//! sent from a smart account.

pub mod chain;
pub mod deploy;
pub mod eip712;
pub mod fill;
pub mod paymaster;
pub mod request;
pub mod typed_data;

pub use chain::{ChainConfig, ChainRegistry, ABSTRACT_MAINNET_CHAIN_ID, ABSTRACT_TESTNET_CHAIN_ID};
pub use deploy::{
    encode_deploy_data, hash_bytecode, prepare_deployment, DeployParams, DeploymentType,
    CONTRACT_DEPLOYER_ADDRESS,
};
pub use eip712::{
    assert_eip712_request, assert_request, is_eip712_transaction, Eip712Transaction,
    EIP712_TX_TYPE,
};
pub use fill::{fill_transaction, FeeEstimate, DEFAULT_GAS_PER_PUBDATA};
pub use paymaster::{
    apply_paymaster, approval_based_paymaster_input, general_paymaster_input, PaymasterHandler,
    PaymasterParams,
};
pub use request::{Quantity, TransactionRequest, TxType};
pub use typed_data::{is_zksync_transaction, typed_data_signing_hash, TypedData, ZKSYNC_DOMAIN_NAME};

use agw_types::U256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Transaction is not an EIP-712 transaction")]
    InvalidTransactionType,
    
    #[error("Invalid chain ID: {0}")]
    InvalidChainId(u64),
    
    #[error("maxPriorityFeePerGas ({max_priority_fee_per_gas}) cannot be higher than maxFeePerGas ({max_fee_per_gas})")]
    TipAboveFeeCap {
        max_priority_fee_per_gas: U256,
        max_fee_per_gas: U256,
    },
    
    #[error("Cannot specify both gasPrice and maxFeePerGas/maxPriorityFeePerGas")]
    FeeConflict,
    
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    
    #[error("Invalid quantity for {field}: {value}")]
    InvalidQuantity { field: &'static str, value: String },
    
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(u64),
    
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),
    
    #[error("Paymaster error: {0}")]
    Paymaster(String),
    
    #[error("Invalid typed data: {0}")]
    TypedData(#[from] alloy_dyn_abi::Error),
}

pub type Result<T> = std::result::Result<T, TransactionError>;
