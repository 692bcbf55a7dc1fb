use crate::{Result, TypesError, H160};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(H160);

impl Address {
    pub const ZERO: Address = Address(H160::zero());
    
    pub fn zero() -> Self {
        Self::ZERO
    }
    
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != 20 {
            return Err(TypesError::InvalidLength {
                expected: 20,
                actual: slice.len(),
            });
        }
        Ok(Address(H160::from_slice(slice)))
    }
    
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(H160(bytes))
    }
    
    /// Address occupying the low bytes of a 32-byte ABI word.
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Address::from_bytes(bytes)
    }
    
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
    
    pub fn to_bytes(&self) -> [u8; 20] {
        self.0.to_fixed_bytes()
    }
    
    /// Left-padded 32-byte ABI word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(self.as_bytes());
        word
    }
    
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
    
    pub fn checksum(&self) -> String {
        let address_hex = hex::encode(self.0.as_bytes());
        let hash = Keccak256::digest(address_hex.as_bytes());
        
        let mut checksum = String::with_capacity(40);
        for (i, ch) in address_hex.chars().enumerate() {
            if ch.is_alphabetic() {
                let hash_byte = hash[i / 2];
                let hash_nibble = if i % 2 == 0 {
                    hash_byte >> 4
                } else {
                    hash_byte & 0xf
                };
                
                if hash_nibble >= 8 {
                    checksum.push(ch.to_ascii_uppercase());
                } else {
                    checksum.push(ch.to_ascii_lowercase());
                }
            } else {
                checksum.push(ch);
            }
        }
        
        format!("0x{}", checksum)
    }
    
    pub fn is_valid_checksum(s: &str) -> bool {
        match Self::from_str(s) {
            Ok(addr) => {
                let checksum = addr.checksum();
                s == checksum || s == checksum.to_lowercase()
            }
            Err(_) => false,
        }
    }
}

impl FromStr for Address {
    type Err = TypesError;
    
    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        
        if s.len() != 40 {
            return Err(TypesError::InvalidLength {
                expected: 40,
                actual: s.len(),
            });
        }
        
        let bytes = hex::decode(s).map_err(|_| TypesError::InvalidHex(s.to_string()))?;
        let addr = Address::from_slice(&bytes)?;
        
        // Mixed or upper case input must carry a valid EIP-55 checksum.
        if s.chars().any(|c| c.is_ascii_uppercase()) && addr.checksum()[2..] != *s {
            return Err(TypesError::InvalidChecksum);
        }
        
        Ok(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.checksum())
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl From<H160> for Address {
    fn from(hash: H160) -> Self {
        Address(hash)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_address_checksum() {
        let addr = Address::from_str("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        assert_eq!(
            addr.checksum(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }
    
    #[test]
    fn test_address_from_str() {
        let addr1 = Address::from_str("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let addr2 = Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(addr1, addr2);
        
        assert!(Address::from_str("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").is_err());
        assert!(Address::from_str("0x1234").is_err());
    }
    
    #[test]
    fn test_word_roundtrip() {
        let addr = Address::from_bytes([0xab; 20]);
        let word = addr.to_word();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(Address::from_word(&word), addr);
    }
    
    const FIXED: Address = Address::from_bytes([0x42; 20]);
    
    #[test]
    fn test_const_construction() {
        assert_eq!(FIXED.as_bytes(), &[0x42u8; 20][..]);
        assert_eq!(FIXED.to_bytes(), [0x42u8; 20]);
        assert!(Address::ZERO.is_zero());
    }
    
    #[test]
    fn test_serde_hex() {
        let addr = Address::from_bytes([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x1111111111111111111111111111111111111111\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
