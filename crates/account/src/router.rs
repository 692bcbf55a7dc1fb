//! Choice between signing locally and delegating to a remote wallet.

use crate::signer::Signer;
use crate::transport::RemoteChannel;
use crate::value::Value;
use crate::{AccountError, Result};
use tracing::debug;

/// Methods understood by the remote smart-wallet provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMethod {
    SignTransaction,
    SendTransaction,
    SignMessage,
    SignTypedData,
}

impl RemoteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteMethod::SignTransaction => "privy_signSmartWalletTx",
            RemoteMethod::SendTransaction => "privy_sendSmartWalletTx",
            RemoteMethod::SignMessage => "privy_signSmartWalletMessage",
            RemoteMethod::SignTypedData => "privy_signSmartWalletTypedData",
        }
    }
}

/// Where a signing request goes.
pub enum Route<'a> {
    /// Serialized and sent over the remote channel.
    Remote(&'a dyn RemoteChannel),
    /// Signed here and wrapped for the account's validator.
    Local(&'a dyn Signer),
}

/// Resolve the route for a request. A remote channel takes precedence.
///
/// Fails with [`AccountError::AccountNotFound`] when there is nothing to
/// sign with; this happens before any network traffic.
pub fn resolve_route<'a>(
    signer: Option<&'a dyn Signer>,
    remote: Option<&'a dyn RemoteChannel>,
) -> Result<Route<'a>> {
    match (remote, signer) {
        (Some(remote), _) => Ok(Route::Remote(remote)),
        (None, Some(signer)) => Ok(Route::Local(signer)),
        (None, None) => Err(AccountError::AccountNotFound),
    }
}

/// Send one request with the integer-coerced value as its only parameter.
pub async fn send_remote(
    channel: &dyn RemoteChannel,
    method: RemoteMethod,
    params: Value,
) -> Result<serde_json::Value> {
    let params = serde_json::Value::Array(vec![params.coerce_integers().into_json()]);
    debug!(method = method.as_str(), "Delegating to remote wallet");
    channel
        .request(method.as_str(), params)
        .await
        .map_err(|e| AccountError::Remote(format!("{}: {}", method.as_str(), e)))
}

/// Parse a hex string result returned by the remote wallet.
pub(crate) fn parse_remote_hex<T: std::str::FromStr>(
    method: RemoteMethod,
    response: &serde_json::Value,
) -> Result<T> {
    response
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AccountError::Remote(format!("{}: unexpected response {}", method.as_str(), response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::LocalSigner;
    use agw_session::BoxError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    
    #[derive(Default)]
    struct RecordingChannel {
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }
    
    #[async_trait]
    impl RemoteChannel for RecordingChannel {
        async fn request(&self, method: &str, params: serde_json::Value) -> std::result::Result<serde_json::Value, BoxError> {
            self.calls.lock().unwrap().push((method.to_string(), params));
            Ok(json!("0x1234"))
        }
    }
    
    #[test]
    fn test_route_resolution() {
        let signer = LocalSigner::random();
        let channel = RecordingChannel::default();
        
        assert!(matches!(resolve_route(Some(&signer), None), Ok(Route::Local(_))));
        assert!(matches!(resolve_route(Some(&signer), Some(&channel)), Ok(Route::Remote(_))));
        assert!(matches!(resolve_route(None, None), Err(AccountError::AccountNotFound)));
    }
    
    #[tokio::test]
    async fn test_send_remote_coerces_params() {
        let channel = RecordingChannel::default();
        let params = Value::from(json!({ "value": 255, "data": "0x" }));
        
        let response = send_remote(&channel, RemoteMethod::SignTransaction, params).await.unwrap();
        assert_eq!(response, json!("0x1234"));
        
        let calls = channel.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "privy_signSmartWalletTx");
        assert_eq!(calls[0].1, json!([{ "value": "0xff", "data": "0x" }]));
    }
    
    #[test]
    fn test_parse_remote_hex() {
        let bytes: agw_types::Bytes = parse_remote_hex(RemoteMethod::SignMessage, &json!("0xdead")).unwrap();
        assert_eq!(bytes.as_slice(), &[0xde, 0xad]);
        
        let result: Result<agw_types::H256> = parse_remote_hex(RemoteMethod::SendTransaction, &json!(42));
        assert!(matches!(result, Err(AccountError::Remote(_))));
    }
}
