use agw_types::{Address, Bytes, H256, U256, UintExt};
use bytes::BytesMut;

pub trait Encode {
    fn encode(&self, encoder: &mut Encoder);
}

#[derive(Default)]
pub struct Encoder {
    buffer: BytesMut,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            buffer: BytesMut::new(),
        }
    }
    
    pub fn finish(self) -> Vec<u8> {
        self.buffer.to_vec()
    }
    
    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        match bytes.len() {
            1 if bytes[0] < 0x80 => self.buffer.extend_from_slice(bytes),
            len => {
                self.encode_header(0x80, len);
                self.buffer.extend_from_slice(bytes);
            }
        }
    }
    
    pub fn encode_list<T: Encode>(&mut self, items: &[T]) {
        let mut list_encoder = Encoder::new();
        for item in items {
            item.encode(&mut list_encoder);
        }
        self.append_list_payload(&list_encoder.finish());
    }
    
    /// Wrap already-encoded items into a list. Used for heterogeneous
    /// records such as transaction envelopes.
    pub fn encode_raw_list(&mut self, encoded_items: &[Vec<u8>]) {
        let payload = encoded_items.concat();
        self.append_list_payload(&payload);
    }
    
    pub fn encode_u64(&mut self, value: u64) {
        let bytes = value.to_be_bytes();
        let first_non_zero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        self.encode_bytes(&bytes[first_non_zero..]);
    }
    
    fn append_list_payload(&mut self, payload: &[u8]) {
        self.encode_header(0xc0, payload.len());
        self.buffer.extend_from_slice(payload);
    }
    
    fn encode_header(&mut self, offset: u8, len: usize) {
        if len < 56 {
            self.buffer.extend_from_slice(&[offset + len as u8]);
        } else {
            let len_bytes = encode_length(len);
            self.buffer.extend_from_slice(&[offset + 55 + len_bytes.len() as u8]);
            self.buffer.extend_from_slice(&len_bytes);
        }
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    let bytes = (len as u64).to_be_bytes();
    let first_non_zero = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[first_non_zero..].to_vec()
}

impl Encode for u64 {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_u64(*self);
    }
}

impl Encode for [u8] {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_bytes(self);
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_bytes(self);
    }
}

impl Encode for Bytes {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_bytes(self.as_slice());
    }
}

impl Encode for Address {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_bytes(self.as_bytes());
    }
}

impl Encode for H256 {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_bytes(self.as_bytes());
    }
}

impl Encode for U256 {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_bytes(&self.to_be_bytes_trimmed());
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.encode_list(self);
    }
}
