//! Collaborators the client talks to. Implementations live outside this
//! crate (JSON-RPC clients, wallet connectors); tests use in-memory mocks.

use agw_session::{BoxError, ContractReader};
use agw_transaction::{FeeEstimate, TransactionRequest};
use agw_types::{Address, Bytes, H256};
use async_trait::async_trait;

/// Read and submit access to a chain node.
#[async_trait]
pub trait PublicClient: ContractReader {
    async fn get_code(&self, address: Address) -> Result<Bytes, BoxError>;
    
    async fn get_transaction_count(&self, address: Address) -> Result<u64, BoxError>;
    
    async fn estimate_fee(&self, request: &TransactionRequest) -> Result<FeeEstimate, BoxError>;
    
    /// Submit a serialized transaction and return its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256, BoxError>;
}

/// Request channel to a wallet that signs on the account's behalf, such as
/// an embedded wallet provider reached through a cross-app connection.
#[async_trait]
pub trait RemoteChannel: Send + Sync {
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, BoxError>;
}
