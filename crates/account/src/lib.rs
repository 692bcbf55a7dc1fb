//! Client for Abstract Global Wallet smart accounts.
//!
//! [`AbstractClient`] signs and sends transactions for a smart account,
//! either with the owner's key, with a session key, or by delegating to a
//! remote wallet.

pub mod client;
pub mod contracts;
pub mod optimistic;
pub mod router;
pub mod signer;
pub mod transport;
pub mod value;
pub mod wrapper;

pub use client::{AbstractClient, CreateSessionResult};
pub use optimistic::{AccountStateOverride, OptimisticOverrides, OptimisticTransaction};
pub use router::{resolve_route, send_remote, RemoteMethod, Route};
pub use signer::{LocalSigner, Signer};
pub use transport::{PublicClient, RemoteChannel};
pub use value::{hex_quantity, Value};
pub use wrapper::{build_hook_data, unwrap_signature, wrap_signature, WrappedSignature};

use agw_session::BoxError;
use agw_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found")]
    AccountNotFound,
    
    #[error("Contract read {function} on {address:x} with args [{args}] failed: {source}")]
    ContractRead {
        function: String,
        address: Address,
        args: String,
        #[source]
        source: BoxError,
    },
    
    #[error("Contract write {function} on {address:x} with args [{args}] failed: {source}")]
    ContractWrite {
        function: String,
        address: Address,
        args: String,
        #[source]
        source: Box<AccountError>,
    },
    
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(u64),
    
    #[error("Session signer {expected:x} does not match local signer {actual:x}")]
    SessionSignerMismatch { expected: Address, actual: Address },
    
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    
    #[error("Remote wallet error: {0}")]
    Remote(String),
    
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),
    
    #[error("Signing error: {0}")]
    Signing(String),
    
    #[error("Session error: {0}")]
    Session(#[from] agw_session::SessionError),
    
    #[error("Transaction error: {0}")]
    Transaction(#[from] agw_transaction::TransactionError),
    
    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    
    #[error("Crypto error: {0}")]
    Crypto(#[from] agw_crypto::CryptoError),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AccountError>;
