use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RlpError {
    #[error("Unexpected end of input")]
    UnexpectedEof,
    
    #[error("Leading zeros in length prefix")]
    LeadingZeros,
    
    #[error("Length overflow")]
    LengthOverflow,
    
    #[error("{0} trailing bytes after item")]
    TrailingBytes(usize),
}
