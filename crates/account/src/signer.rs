use agw_crypto::{hash_message, parse_private_key, private_key_to_address, Signature};
use agw_transaction::{typed_data_signing_hash, TypedData};
use agw_types::{Address, H256};
use async_trait::async_trait;
use secp256k1::SecretKey;

use crate::{AccountError, Result};

/// Key that signs on behalf of the smart account: the owner's key for
/// global operations, or a session key.
#[async_trait]
pub trait Signer: Send + Sync {
    fn address(&self) -> Address;
    
    /// Sign a 32-byte digest without any prefix.
    async fn sign_hash(&self, hash: H256) -> Result<Signature>;
    
    /// Sign an EIP-191 personal message.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.sign_hash(hash_message(message)).await
    }
    
    /// Sign EIP-712 typed data.
    async fn sign_typed_data(&self, data: &TypedData) -> Result<Signature> {
        let hash = typed_data_signing_hash(data)?;
        self.sign_hash(hash).await
    }
}

/// Signer backed by an in-memory private key.
#[derive(Clone)]
pub struct LocalSigner {
    private_key: SecretKey,
    address: Address,
}

impl LocalSigner {
    pub fn new(private_key: SecretKey) -> Self {
        let address = private_key_to_address(&private_key);
        Self { private_key, address }
    }
    
    /// Create a signer with a freshly generated key.
    pub fn random() -> Self {
        Self::new(agw_crypto::generate_private_key())
    }
    
    pub fn from_private_key_str(key: &str) -> Result<Self> {
        let private_key = parse_private_key(key)?;
        Ok(Self::new(private_key))
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }
    
    async fn sign_hash(&self, hash: H256) -> Result<Signature> {
        agw_crypto::sign_hash(&hash, &self.private_key).map_err(|e| AccountError::Signing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agw_crypto::recover_address;
    
    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    
    #[test]
    fn test_address_from_key() {
        let signer = LocalSigner::from_private_key_str(KEY).unwrap();
        assert_eq!(
            format!("{:x}", signer.address()),
            "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23"
        );
    }
    
    #[tokio::test]
    async fn test_sign_hash_recovers() {
        let signer = LocalSigner::random();
        let hash = H256::repeat_byte(0x42);
        let signature = signer.sign_hash(hash).await.unwrap();
        assert_eq!(recover_address(&hash, &signature).unwrap(), signer.address());
    }
    
    #[tokio::test]
    async fn test_sign_message_uses_prefix() {
        let signer = LocalSigner::random();
        let signature = signer.sign_message(b"hello").await.unwrap();
        assert_eq!(
            recover_address(&hash_message(b"hello"), &signature).unwrap(),
            signer.address()
        );
    }
    
    #[test]
    fn test_debug_hides_key() {
        let signer = LocalSigner::from_private_key_str(KEY).unwrap();
        assert!(!format!("{:?}", signer).contains("4c0883a6"));
    }
}
