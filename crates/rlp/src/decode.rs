use crate::{RlpError, RlpItem};

/// Structural decoder producing an [`RlpItem`] tree.
pub struct Decoder<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Decoder { data, position: 0 }
    }
    
    pub fn position(&self) -> usize {
        self.position
    }
    
    pub fn is_finished(&self) -> bool {
        self.position >= self.data.len()
    }
    
    pub fn decode_item(&mut self) -> Result<RlpItem, RlpError> {
        let (offset, len, is_data) = self.decode_header()?;
        
        self.position += offset;
        let end_position = self
            .position
            .checked_add(len)
            .ok_or(RlpError::LengthOverflow)?;
        
        if end_position > self.data.len() {
            return Err(RlpError::UnexpectedEof);
        }
        
        if is_data {
            let bytes = self.data[self.position..end_position].to_vec();
            self.position = end_position;
            Ok(RlpItem::String(bytes))
        } else {
            let mut items = Vec::new();
            while self.position < end_position {
                items.push(self.decode_item()?);
            }
            if self.position != end_position {
                return Err(RlpError::UnexpectedEof);
            }
            Ok(RlpItem::List(items))
        }
    }
    
    fn decode_header(&self) -> Result<(usize, usize, bool), RlpError> {
        let prefix = *self.data.get(self.position).ok_or(RlpError::UnexpectedEof)?;
        
        match prefix {
            0x00..=0x7f => Ok((0, 1, true)),
            0x80..=0xb7 => Ok((1, (prefix - 0x80) as usize, true)),
            0xb8..=0xbf => {
                let len_of_len = (prefix - 0xb7) as usize;
                let len = self.long_length(len_of_len)?;
                Ok((1 + len_of_len, len, true))
            }
            0xc0..=0xf7 => Ok((1, (prefix - 0xc0) as usize, false)),
            0xf8..=0xff => {
                let len_of_len = (prefix - 0xf7) as usize;
                let len = self.long_length(len_of_len)?;
                Ok((1 + len_of_len, len, false))
            }
        }
    }
    
    fn long_length(&self, len_of_len: usize) -> Result<usize, RlpError> {
        let start = self.position + 1;
        let bytes = self
            .data
            .get(start..start + len_of_len)
            .ok_or(RlpError::UnexpectedEof)?;
        
        if bytes[0] == 0 {
            return Err(RlpError::LeadingZeros);
        }
        
        let mut len = 0usize;
        for &byte in bytes {
            len = len
                .checked_shl(8)
                .and_then(|l| l.checked_add(byte as usize))
                .ok_or(RlpError::LengthOverflow)?;
        }
        Ok(len)
    }
}
