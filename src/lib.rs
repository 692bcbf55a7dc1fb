//! Client SDK for Abstract Global Wallet smart accounts.
//!
//! The workspace crates are re-exported here so applications can depend on
//! a single package.

pub mod config;

pub use config::{Config, LogConfig};

// Re-export crate modules
pub use agw_account as account;
pub use agw_crypto as crypto;
pub use agw_rlp as rlp;
pub use agw_session as session;
pub use agw_transaction as transaction;
pub use agw_types as types;

// Re-export commonly used types
pub use agw_account::{AbstractClient, AccountError, LocalSigner, PublicClient, RemoteChannel, Signer};
pub use agw_session::{encode_session, get_session_hash, SessionConfig, SessionOrHash, SessionStatus};
pub use agw_transaction::{ChainConfig, ChainRegistry, TransactionRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get client version string
pub fn client_version() -> String {
    format!("agw-sdk/v{}/rust", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_version() {
        assert!(client_version().starts_with("agw-sdk/v"));
        assert!(client_version().contains(VERSION));
    }
}
