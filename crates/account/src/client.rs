use crate::optimistic::{OptimisticOverrides, OptimisticTransaction};
use crate::router::{parse_remote_hex, resolve_route, send_remote, RemoteMethod, Route};
use crate::signer::Signer;
use crate::transport::{PublicClient, RemoteChannel};
use crate::value::Value;
use crate::contracts::IAgwAccount;
use crate::wrapper::{build_hook_data, wrap_signature};
use crate::{AccountError, Result};
use agw_session::{
    create_session_calldata, encode_session, encode_session_with_period_ids, get_session_hash,
    get_session_status, period_ids_for_transaction, revoke_keys_calldata, selector_of,
    SessionConfig, SessionOrHash, SessionStatus,
};
use agw_transaction::{
    apply_paymaster, assert_eip712_request, fill_transaction, is_zksync_transaction,
    prepare_deployment, ChainConfig, ChainRegistry, DeployParams, Eip712Transaction,
    PaymasterHandler, TransactionRequest, TxType, TypedData,
};
use agw_types::{Address, AlloyCompat, Bytes, H256};
use alloy_sol_types::SolCall;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionResult {
    pub transaction_hash: H256,
    pub session: SessionConfig,
}

/// Client for one smart account on one chain.
///
/// Without a session it acts as the account owner. [`AbstractClient::with_session`]
/// derives a client that signs with a session key instead; that client can
/// only send transactions allowed by the session's policies.
#[derive(Clone)]
pub struct AbstractClient {
    account: Address,
    chain: ChainConfig,
    public_client: Arc<dyn PublicClient>,
    signer: Option<Arc<dyn Signer>>,
    remote: Option<Arc<dyn RemoteChannel>>,
    paymaster_handler: Option<Arc<dyn PaymasterHandler>>,
    session: Option<SessionConfig>,
}

impl AbstractClient {
    pub fn new(account: Address, chain: ChainConfig, public_client: Arc<dyn PublicClient>) -> Self {
        Self {
            account,
            chain,
            public_client,
            signer: None,
            remote: None,
            paymaster_handler: None,
            session: None,
        }
    }
    
    /// Client for `chain_id`, looked up in `registry`.
    pub fn for_chain(
        account: Address,
        registry: &ChainRegistry,
        chain_id: u64,
        public_client: Arc<dyn PublicClient>,
    ) -> Result<Self> {
        let chain = registry
            .get(chain_id)
            .map_err(|_| AccountError::UnsupportedChain(chain_id))?
            .clone();
        Ok(Self::new(account, chain, public_client))
    }
    
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }
    
    /// Delegate owner operations to a remote wallet.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteChannel>) -> Self {
        self.remote = Some(remote);
        self
    }
    
    pub fn with_paymaster_handler(mut self, handler: Arc<dyn PaymasterHandler>) -> Self {
        self.paymaster_handler = Some(handler);
        self
    }
    
    /// Session-scoped client. The local signer must be the session signer.
    pub fn with_session(&self, session: SessionConfig) -> Self {
        let mut client = self.clone();
        client.session = Some(session);
        client
    }
    
    pub fn account(&self) -> Address {
        self.account
    }
    
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }
    
    pub fn session(&self) -> Option<&SessionConfig> {
        self.session.as_ref()
    }
    
    fn owner(&self) -> Self {
        let mut client = self.clone();
        client.session = None;
        client
    }
    
    fn route(&self) -> Result<Route<'_>> {
        match &self.session {
            Some(session) => {
                let signer = self.signer.as_deref().ok_or(AccountError::AccountNotFound)?;
                if signer.address() != session.signer {
                    return Err(AccountError::SessionSignerMismatch {
                        expected: session.signer,
                        actual: signer.address(),
                    });
                }
                Ok(Route::Local(signer))
            }
            None => resolve_route(self.signer.as_deref(), self.remote.as_deref()),
        }
    }
    
    pub async fn is_deployed(&self) -> Result<bool> {
        let code = self
            .public_client
            .get_code(self.account)
            .await
            .map_err(AccountError::Transport)?;
        Ok(!code.is_empty())
    }
    
    /// Validation hooks installed on the account, via `listHooks(true)`.
    pub async fn validation_hooks(&self) -> Result<Vec<Address>> {
        let read_error = |source: agw_session::BoxError| AccountError::ContractRead {
            function: "listHooks".to_string(),
            address: self.account,
            args: "true".to_string(),
            source,
        };
        
        let call = IAgwAccount::listHooksCall { isValidation: true };
        let output = self
            .public_client
            .call(self.account, Bytes::from_vec(call.abi_encode()))
            .await
            .map_err(read_error)?;
        
        let hooks = IAgwAccount::listHooksCall::abi_decode_returns(&output, true)
            .map_err(|e| read_error(Box::new(e)))?
            .hookList;
        Ok(hooks.into_iter().map(Address::from_alloy).collect())
    }
    
    /// Hooks of a deployed account; an undeployed account has none.
    async fn installed_hooks(&self) -> Result<Vec<Address>> {
        if self.is_deployed().await? {
            self.validation_hooks().await
        } else {
            Ok(Vec::new())
        }
    }
    
    pub async fn session_status(&self, session: &SessionOrHash) -> Result<SessionStatus> {
        let status = get_session_status(
            self.public_client.as_ref(),
            self.chain.session_key_validator,
            self.account,
            session,
        )
        .await?;
        Ok(status)
    }
    
    async fn prepare_request(&self, mut request: TransactionRequest) -> Result<TransactionRequest> {
        if request.tx_type.is_none() {
            request.tx_type = Some(TxType::Eip712);
        }
        if let Err(e) = assert_eip712_request(&request) {
            warn!(account = %self.account, error = %e, "Rejected transaction request");
            return Err(e.into());
        }
        apply_paymaster(&mut request, self.paymaster_handler.as_deref()).await?;
        Ok(request)
    }
    
    /// Fill, sign and wrap `request` for the account's validator.
    async fn sign_local(
        &self,
        signer: &dyn Signer,
        request: &TransactionRequest,
        hooks: &[Address],
    ) -> Result<Eip712Transaction> {
        let nonce = match request.nonce {
            Some(nonce) => nonce,
            None => self
                .public_client
                .get_transaction_count(self.account)
                .await
                .map_err(AccountError::Transport)?,
        };
        let fees = self
            .public_client
            .estimate_fee(request)
            .await
            .map_err(AccountError::Transport)?;
        let mut tx = fill_transaction(request, self.account, nonce, &fees, &self.chain)?;
        
        let signature = signer.sign_hash(tx.signing_hash()?).await?;
        
        let mut custom = HashMap::new();
        let validator = match &self.session {
            Some(session) => {
                let timestamp = chrono::Utc::now().timestamp().max(0) as u64;
                let period_ids = period_ids_for_transaction(session, tx.to, selector_of(&tx.data), timestamp)?;
                custom.insert(
                    self.chain.session_key_validator,
                    encode_session_with_period_ids(session, &period_ids)?,
                );
                self.chain.session_key_validator
            }
            None => self.chain.eoa_validator,
        };
        
        let hook_data = build_hook_data(hooks, &custom);
        tx.custom_signature = wrap_signature(&signature.to_bytes(), validator, &hook_data);
        debug!(
            account = %self.account,
            validator = %validator,
            hooks = hooks.len(),
            nonce = tx.nonce,
            "Signed transaction"
        );
        Ok(tx)
    }
    
    fn remote_request(&self, request: &TransactionRequest) -> Value {
        let mut request = request.clone();
        request.from.get_or_insert(self.account);
        Value::from(&request)
    }
    
    /// Sign `request` and return the serialized transaction.
    pub async fn sign_transaction(&self, request: TransactionRequest) -> Result<Bytes> {
        match self.route()? {
            Route::Remote(channel) => {
                let method = RemoteMethod::SignTransaction;
                let response = send_remote(channel, method, self.remote_request(&request)).await?;
                parse_remote_hex(method, &response)
            }
            Route::Local(signer) => {
                let request = self.prepare_request(request).await?;
                let hooks = self.installed_hooks().await?;
                let tx = self.sign_local(signer, &request, &hooks).await?;
                Ok(tx.serialize())
            }
        }
    }
    
    /// Sign and submit `request`; returns the transaction hash.
    pub async fn send_transaction(&self, request: TransactionRequest) -> Result<H256> {
        let hash = match self.route()? {
            Route::Remote(channel) => {
                let method = RemoteMethod::SendTransaction;
                let response = send_remote(channel, method, self.remote_request(&request)).await?;
                parse_remote_hex(method, &response)?
            }
            Route::Local(signer) => {
                let request = self.prepare_request(request).await?;
                let hooks = self.installed_hooks().await?;
                let tx = self.sign_local(signer, &request, &hooks).await?;
                self.public_client
                    .send_raw_transaction(tx.serialize())
                    .await
                    .map_err(AccountError::Transport)?
            }
        };
        info!(account = %self.account, hash = ?hash, session = self.session.is_some(), "Sent transaction");
        Ok(hash)
    }
    
    /// Deploy a contract from the account.
    pub async fn deploy_contract(&self, params: &DeployParams, request: TransactionRequest) -> Result<H256> {
        let request = prepare_deployment(request, params, &self.chain)?;
        self.send_transaction(request).await
    }
    
    /// Sign `request` without reading the account's deployment state or
    /// hooks, assuming `overrides` instead. Nothing is submitted.
    pub async fn sign_transaction_optimistic(
        &self,
        request: TransactionRequest,
        overrides: &OptimisticOverrides,
    ) -> Result<OptimisticTransaction> {
        let signer = match self.route()? {
            Route::Local(signer) => signer,
            Route::Remote(_) => {
                return Err(AccountError::Unsupported(
                    "optimistic signing requires a local signer".to_string(),
                ))
            }
        };
        let request = self.prepare_request(request).await?;
        let state = overrides.resolve(self.chain.session_key_validator);
        let tx = self.sign_local(signer, &request, state.signing_hooks()).await?;
        
        debug!(
            account = %self.account,
            deployed = state.is_deployed,
            hooks = state.signing_hooks().len(),
            "Signed optimistic transaction"
        );
        Ok(OptimisticTransaction {
            raw: tx.serialize(),
            state_override: state.state_override(self.account),
            state,
        })
    }
    
    /// Sign an EIP-191 message as the account owner.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Bytes> {
        match self.route()? {
            Route::Remote(channel) => {
                let method = RemoteMethod::SignMessage;
                let params = Value::Str(format!("{:x}", Bytes::from(message)));
                let response = send_remote(channel, method, params).await?;
                parse_remote_hex(method, &response)
            }
            Route::Local(signer) => {
                if self.session.is_some() {
                    return Err(AccountError::Unsupported(
                        "session keys cannot sign messages".to_string(),
                    ));
                }
                let signature = signer.sign_message(message).await?;
                self.wrap_owner_signature(&signature.to_bytes()).await
            }
        }
    }
    
    /// Sign EIP-712 typed data. zkSync transactions are signed raw, since
    /// the account validates those itself; anything else is wrapped for the
    /// owner validator.
    pub async fn sign_typed_data(&self, data: &TypedData) -> Result<Bytes> {
        match self.route()? {
            Route::Remote(channel) => {
                let method = RemoteMethod::SignTypedData;
                let params = Value::from(serde_json::to_value(data)?);
                let response = send_remote(channel, method, params).await?;
                parse_remote_hex(method, &response)
            }
            Route::Local(signer) => {
                if is_zksync_transaction(data) {
                    let signature = signer.sign_typed_data(data).await?;
                    return Ok(Bytes::from(signature.to_bytes()));
                }
                if self.session.is_some() {
                    return Err(AccountError::Unsupported(
                        "session keys cannot sign typed data".to_string(),
                    ));
                }
                let signature = signer.sign_typed_data(data).await?;
                self.wrap_owner_signature(&signature.to_bytes()).await
            }
        }
    }
    
    async fn wrap_owner_signature(&self, signature: &[u8]) -> Result<Bytes> {
        let hooks = self.installed_hooks().await?;
        let hook_data = build_hook_data(&hooks, &HashMap::new());
        Ok(wrap_signature(signature, self.chain.eoa_validator, &hook_data))
    }
    
    async fn write_as_owner(&self, function: &str, to: Address, data: Bytes, args: String) -> Result<H256> {
        let request = TransactionRequest::new().to(to).data(data);
        self.owner()
            .send_transaction(request)
            .await
            .map_err(|e| AccountError::ContractWrite {
                function: function.to_string(),
                address: to,
                args,
                source: Box::new(e),
            })
    }
    
    /// Register `session` for the account.
    ///
    /// If the session-key validator is already installed the session is
    /// created on it directly; otherwise the validator is installed as a
    /// module with the session as its init data.
    pub async fn create_session(&self, session: SessionConfig) -> Result<CreateSessionResult> {
        self.owner().route()?;
        let session_hash = get_session_hash(&session)?;
        let validator = self.chain.session_key_validator;
        let hooks = self.installed_hooks().await?;
        
        let transaction_hash = if hooks.contains(&validator) {
            let data = create_session_calldata(&session)?;
            self.write_as_owner("createSession", validator, data, format!("{:?}", session_hash))
                .await?
        } else {
            let mut init = validator.as_bytes().to_vec();
            init.extend_from_slice(&encode_session(&session)?);
            let call = IAgwAccount::addModuleCall {
                moduleAndData: Bytes::from_vec(init).to_alloy(),
            };
            let data = Bytes::from_vec(call.abi_encode());
            self.write_as_owner("addModule", self.account, data, format!("{:x}", validator))
                .await?
        };
        
        info!(
            account = %self.account,
            session = ?session_hash,
            signer = %session.signer,
            tx = ?transaction_hash,
            "Created session"
        );
        Ok(CreateSessionResult {
            transaction_hash,
            session,
        })
    }
    
    /// Revoke sessions, given by hash or by configuration.
    pub async fn revoke_sessions(&self, sessions: &[SessionOrHash]) -> Result<H256> {
        self.owner().route()?;
        let hashes = sessions
            .iter()
            .map(SessionOrHash::session_hash)
            .collect::<agw_session::Result<Vec<H256>>>()?;
        
        let data = revoke_keys_calldata(&hashes);
        let validator = self.chain.session_key_validator;
        let transaction_hash = self
            .write_as_owner("revokeKeys", validator, data, format!("{:?}", hashes))
            .await?;
        
        info!(account = %self.account, count = hashes.len(), tx = ?transaction_hash, "Revoked sessions");
        Ok(transaction_hash)
    }
}
