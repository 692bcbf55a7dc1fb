pub mod decode;
pub mod encode;
pub mod error;

pub use decode::Decoder;
pub use encode::{Encode, Encoder};
pub use error::RlpError;

use agw_types::Bytes;

pub fn encode<T: Encode + ?Sized>(value: &T) -> Bytes {
    let mut encoder = Encoder::new();
    value.encode(&mut encoder);
    Bytes::from_vec(encoder.finish())
}

/// Decode a single item, rejecting trailing bytes.
pub fn decode_item(data: &[u8]) -> Result<RlpItem, RlpError> {
    let mut decoder = Decoder::new(data);
    let item = decoder.decode_item()?;
    if !decoder.is_finished() {
        return Err(RlpError::TrailingBytes(data.len() - decoder.position()));
    }
    Ok(item)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    String(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpItem::String(bytes) => Some(bytes),
            RlpItem::List(_) => None,
        }
    }
    
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::String(_) => None,
            RlpItem::List(items) => Some(items),
        }
    }
}
