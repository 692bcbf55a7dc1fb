pub use primitive_types::{H160, H256};

/// Lenient construction from slices of any length: short input is
/// zero-padded on the right, long input is truncated.
pub trait HashExt {
    fn from_slice_padded(slice: &[u8]) -> Self;
}

impl HashExt for H160 {
    fn from_slice_padded(slice: &[u8]) -> Self {
        let mut hash = H160::zero();
        let len = std::cmp::min(slice.len(), 20);
        hash.as_bytes_mut()[..len].copy_from_slice(&slice[..len]);
        hash
    }
}

impl HashExt for H256 {
    fn from_slice_padded(slice: &[u8]) -> Self {
        let mut hash = H256::zero();
        let len = std::cmp::min(slice.len(), 32);
        hash.as_bytes_mut()[..len].copy_from_slice(&slice[..len]);
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_hash_from_long_slice() {
        let data = vec![1u8; 100];
        
        let h160 = H160::from_slice_padded(&data);
        assert_eq!(h160.as_bytes()[19], 1);
        
        let h256 = H256::from_slice_padded(&data);
        assert_eq!(h256.as_bytes()[0], 1);
        assert_eq!(h256.as_bytes()[31], 1);
    }
    
    #[test]
    fn test_hash_from_short_slice() {
        let data = vec![0xffu8; 4];
        
        let h256 = H256::from_slice_padded(&data);
        assert_eq!(h256.as_bytes()[3], 0xff);
        assert_eq!(h256.as_bytes()[4], 0);
    }
}
