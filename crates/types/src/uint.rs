pub use primitive_types::U256;

pub trait UintExt: Sized {
    fn from_be_bytes_vec(bytes: &[u8]) -> Self;
    
    /// Minimal big-endian representation. Zero yields an empty vector.
    fn to_be_bytes_trimmed(&self) -> Vec<u8>;
    
    /// Full 32-byte big-endian word.
    fn to_word(&self) -> [u8; 32];
}

impl UintExt for U256 {
    fn from_be_bytes_vec(bytes: &[u8]) -> Self {
        let mut array = [0u8; 32];
        let len = std::cmp::min(bytes.len(), 32);
        let offset = 32 - len;
        array[offset..].copy_from_slice(&bytes[bytes.len() - len..]);
        U256::from_big_endian(&array)
    }
    
    fn to_be_bytes_trimmed(&self) -> Vec<u8> {
        let bytes = self.to_word();
        match bytes.iter().position(|&b| b != 0) {
            Some(first_non_zero) => bytes[first_non_zero..].to_vec(),
            None => Vec::new(),
        }
    }
    
    fn to_word(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        bytes
    }
}

pub const MAX_U256: U256 = U256::MAX;
