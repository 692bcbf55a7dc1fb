//! Account signature envelope.
//!
//! The smart account dispatches validation on the envelope
//! `abi.encode(bytes signature, address validator, bytes[] hookData)`:
//! `validator` checks `signature`, and every installed validation hook
//! receives the `hookData` entry at its own position.

use agw_types::{Address, AlloyCompat, Bytes};
use alloy_sol_types::SolValue;
use std::collections::HashMap;

use crate::Result;

/// `(bytes signature, address validator, bytes[] hookData)`
type Envelope = (alloy_primitives::Bytes, alloy_primitives::Address, Vec<alloy_primitives::Bytes>);

/// One hook data entry per installed hook, in hook order.
///
/// `custom` supplies data for specific hooks; every other hook receives
/// empty bytes.
pub fn build_hook_data(hooks: &[Address], custom: &HashMap<Address, Bytes>) -> Vec<Bytes> {
    hooks
        .iter()
        .map(|hook| custom.get(hook).cloned().unwrap_or_default())
        .collect()
}

/// Wrap a raw ECDSA signature for `validator`.
pub fn wrap_signature(signature: &[u8], validator: Address, hook_data: &[Bytes]) -> Bytes {
    let envelope: Envelope = (
        Bytes::from_slice(signature).to_alloy(),
        validator.to_alloy(),
        hook_data.iter().map(AlloyCompat::to_alloy).collect(),
    );
    Bytes::from_vec(envelope.abi_encode_params())
}

/// Decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedSignature {
    pub signature: Bytes,
    pub validator: Address,
    pub hook_data: Vec<Bytes>,
}

/// Inverse of [`wrap_signature`].
pub fn unwrap_signature(data: &[u8]) -> Result<WrappedSignature> {
    let (signature, validator, hook_data) = Envelope::abi_decode_params(data, true)?;
    Ok(WrappedSignature {
        signature: Bytes::from_alloy(signature),
        validator: Address::from_alloy(validator),
        hook_data: hook_data.into_iter().map(Bytes::from_alloy).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_hook_data_positions() {
        let first = Address::from_bytes([0x01; 20]);
        let session = Address::from_bytes([0x34; 20]);
        let last = Address::from_bytes([0x03; 20]);
        
        let mut custom = HashMap::new();
        custom.insert(session, Bytes::from(vec![0xab, 0xcd]));
        
        let data = build_hook_data(&[first, session, last], &custom);
        assert_eq!(data, vec![Bytes::new(), Bytes::from(vec![0xab, 0xcd]), Bytes::new()]);
        
        assert!(build_hook_data(&[], &custom).is_empty());
    }
    
    #[test]
    fn test_wrap_roundtrip() {
        let validator = Address::from_bytes([0x74; 20]);
        let hook_data = vec![Bytes::new(), Bytes::from(vec![1, 2, 3])];
        let wrapped = wrap_signature(&[0x11; 65], validator, &hook_data);
        
        let decoded = unwrap_signature(&wrapped).unwrap();
        assert_eq!(decoded.signature, Bytes::from(vec![0x11; 65]));
        assert_eq!(decoded.validator, validator);
        assert_eq!(decoded.hook_data, hook_data);
    }
    
    #[test]
    fn test_empty_hook_list_layout() {
        let wrapped = wrap_signature(&[0x11; 65], Address::zero(), &[]);
        // heads(3) + sig length + 3 sig words + array length
        assert_eq!(wrapped.len(), 32 * 8);
        assert_eq!(wrapped[31], 0x60);
    }
    
    #[test]
    fn test_truncated_envelope_is_rejected() {
        let wrapped = wrap_signature(&[0x11; 65], Address::zero(), &[Bytes::from(vec![1])]);
        assert!(matches!(
            unwrap_signature(&wrapped[..wrapped.len() - 32]),
            Err(crate::AccountError::Abi(_))
        ));
    }
}
