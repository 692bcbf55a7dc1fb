pub mod address;
pub mod alloy;
pub mod bytes;
pub mod hash;
pub mod uint;

pub use address::Address;
pub use alloy::AlloyCompat;
pub use bytes::Bytes;
pub use hash::{HashExt, H160, H256};
pub use uint::{UintExt, MAX_U256, U256};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
    
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    
    #[error("Invalid address checksum")]
    InvalidChecksum,
}

pub type Result<T> = std::result::Result<T, TypesError>;
