//! Conversions to the `alloy-primitives` types used by the ABI layer.

use crate::{Address, Bytes, UintExt, H256, U256};

/// Lossless conversion between an SDK primitive and its alloy counterpart.
pub trait AlloyCompat: Sized {
    type Alloy;
    
    fn to_alloy(&self) -> Self::Alloy;
    
    fn from_alloy(value: Self::Alloy) -> Self;
}

impl AlloyCompat for Address {
    type Alloy = alloy_primitives::Address;
    
    fn to_alloy(&self) -> Self::Alloy {
        alloy_primitives::Address::from(self.to_bytes())
    }
    
    fn from_alloy(value: Self::Alloy) -> Self {
        Address::from_bytes(value.into_array())
    }
}

impl AlloyCompat for H256 {
    type Alloy = alloy_primitives::B256;
    
    fn to_alloy(&self) -> Self::Alloy {
        alloy_primitives::B256::from(self.to_fixed_bytes())
    }
    
    fn from_alloy(value: Self::Alloy) -> Self {
        H256::from(value.0)
    }
}

impl AlloyCompat for U256 {
    type Alloy = alloy_primitives::U256;
    
    fn to_alloy(&self) -> Self::Alloy {
        alloy_primitives::U256::from_be_bytes(self.to_word())
    }
    
    fn from_alloy(value: Self::Alloy) -> Self {
        U256::from_big_endian(&value.to_be_bytes::<32>())
    }
}

impl AlloyCompat for Bytes {
    type Alloy = alloy_primitives::Bytes;
    
    fn to_alloy(&self) -> Self::Alloy {
        alloy_primitives::Bytes::copy_from_slice(self.as_slice())
    }
    
    fn from_alloy(value: Self::Alloy) -> Self {
        Bytes::from_vec(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_address_conversion() {
        let address = Address::from_bytes([0x5a; 20]);
        let converted = address.to_alloy();
        assert_eq!(converted.as_slice(), address.as_bytes());
        assert_eq!(Address::from_alloy(converted), address);
    }
    
    #[test]
    fn test_u256_conversion() {
        let value = U256::MAX - U256::from(7u8);
        let converted = value.to_alloy();
        assert_eq!(converted, alloy_primitives::U256::MAX - alloy_primitives::U256::from(7u8));
        assert_eq!(U256::from_alloy(converted), value);
        
        assert_eq!(U256::from(0x71u8).to_alloy(), alloy_primitives::U256::from(0x71u8));
    }
    
    #[test]
    fn test_hash_and_bytes_conversion() {
        let mut raw = [0u8; 32];
        raw[0] = 0x01;
        raw[31] = 0xff;
        let hash = H256::from(raw);
        assert_eq!(hash.to_alloy().0, raw);
        assert_eq!(H256::from_alloy(hash.to_alloy()), hash);
        
        let bytes = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes.to_alloy().as_ref(), &[0xde, 0xad, 0xbe, 0xef][..]);
        assert_eq!(Bytes::from_alloy(bytes.to_alloy()), bytes);
    }
}
