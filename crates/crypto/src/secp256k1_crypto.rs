use crate::{CryptoError, Result};
use agw_types::{Address, H256};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, PublicKey, SecretKey, Secp256k1,
};

/// ECDSA signature with recovery ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: H256,
    pub s: H256,
    pub v: u8,
}

impl Signature {
    /// Create a new signature from r, s, and v components
    pub fn new(r: H256, s: H256, v: u8) -> Self {
        Signature { r, s, v }
    }
    
    /// Convert to compact representation (65 bytes: r || s || v)
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(self.r.as_bytes());
        bytes[32..64].copy_from_slice(self.s.as_bytes());
        bytes[64] = self.v;
        bytes
    }
    
    /// Parse from compact representation
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignature);
        }
        
        let r = H256::from_slice(&bytes[0..32]);
        let s = H256::from_slice(&bytes[32..64]);
        let v = bytes[64];
        
        Ok(Signature { r, s, v })
    }
}

/// Sign a 32-byte digest with a private key. `v` is 27 or 28.
pub fn sign_hash(hash: &H256, private_key: &SecretKey) -> Result<Signature> {
    let secp = Secp256k1::new();
    let message = Message::from_slice(hash.as_bytes())?;
    let recoverable_sig = secp.sign_ecdsa_recoverable(&message, private_key);
    let (recovery_id, sig_bytes) = recoverable_sig.serialize_compact();
    
    let v = recovery_id.to_i32() as u8 + 27;
    
    Ok(Signature {
        r: H256::from_slice(&sig_bytes[0..32]),
        s: H256::from_slice(&sig_bytes[32..64]),
        v,
    })
}

/// Recover the public key from a signature
pub fn recover_public_key(hash: &H256, signature: &Signature) -> Result<PublicKey> {
    let secp = Secp256k1::new();
    let message = Message::from_slice(hash.as_bytes())?;
    
    let recovery_id = signature
        .v
        .checked_sub(27)
        .ok_or(CryptoError::InvalidSignature)
        .and_then(|id| RecoveryId::from_i32(id as i32).map_err(|_| CryptoError::InvalidSignature))?;
    
    let mut sig_bytes = [0u8; 64];
    sig_bytes[0..32].copy_from_slice(signature.r.as_bytes());
    sig_bytes[32..64].copy_from_slice(signature.s.as_bytes());
    
    let recoverable_sig = RecoverableSignature::from_compact(&sig_bytes, recovery_id)?;
    let public_key = secp.recover_ecdsa(&message, &recoverable_sig)?;
    
    Ok(public_key)
}

/// Recover the Ethereum address from a signature
pub fn recover_address(hash: &H256, signature: &Signature) -> Result<Address> {
    let public_key = recover_public_key(hash, signature)?;
    Ok(public_key_to_address(&public_key))
}

/// Convert a public key to an Ethereum address
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let public_key_bytes = public_key.serialize_uncompressed();
    // Skip the 0x04 prefix, keep the last 20 bytes of the hash
    let hash = crate::keccak256(&public_key_bytes[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(address)
}

/// Address controlled by a private key
pub fn private_key_to_address(private_key: &SecretKey) -> Address {
    let secp = Secp256k1::new();
    public_key_to_address(&PublicKey::from_secret_key(&secp, private_key))
}

/// Parse a 32-byte hex private key, with or without `0x`
pub fn parse_private_key(s: &str) -> Result<SecretKey> {
    let bytes = hex::decode(s.trim().trim_start_matches("0x"))
        .map_err(|_| CryptoError::InvalidPrivateKey)?;
    if bytes.len() != 32 {
        return Err(CryptoError::InvalidPrivateKey);
    }
    Ok(SecretKey::from_slice(&bytes)?)
}

/// Generate a new random private key
pub fn generate_private_key() -> SecretKey {
    SecretKey::new(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_sign_and_recover() {
        let secp = Secp256k1::new();
        let private_key = SecretKey::from_slice(&[0x01; 32]).unwrap();
        let public_key = PublicKey::from_secret_key(&secp, &private_key);
        let hash = H256::from_slice(&[0x02; 32]);
        
        let signature = sign_hash(&hash, &private_key).unwrap();
        assert!(signature.v == 27 || signature.v == 28);
        let recovered_public_key = recover_public_key(&hash, &signature).unwrap();
        
        assert_eq!(public_key, recovered_public_key);
    }
    
    #[test]
    fn test_public_key_to_address() {
        // Test vector from Ethereum yellow paper
        let private_key_hex = "c85ef7d79691fe79573b1a7064c19c1a9819ebdbd1faaab1a8ec92344438aaf4";
        let expected_address = "cd2a3d9f938e13cd947ec05abc7fe734df8dd826";
        
        let private_key = parse_private_key(private_key_hex).unwrap();
        let address = private_key_to_address(&private_key);
        
        assert_eq!(format!("{:x}", address), format!("0x{}", expected_address));
    }
    
    #[test]
    fn test_parse_private_key_rejects_garbage() {
        assert!(parse_private_key("0x1234").is_err());
        assert!(parse_private_key(&"zz".repeat(32)).is_err());
    }
    
    #[test]
    fn test_signature_serialization() {
        let r = H256::from_slice(&[0x01; 32]);
        let s = H256::from_slice(&[0x02; 32]);
        
        let sig = Signature::new(r, s, 27);
        let bytes = sig.to_bytes();
        let recovered_sig = Signature::from_bytes(&bytes).unwrap();
        
        assert_eq!(sig, recovered_sig);
        assert!(Signature::from_bytes(&bytes[..64]).is_err());
    }
}
