//! Contract deployment through the system contract deployer.

use crate::chain::ChainConfig;
use crate::request::{TransactionRequest, TxType};
use crate::{Result, TransactionError};
use agw_types::{Address, AlloyCompat, Bytes, H256};
use alloy_sol_types::{sol, SolCall};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// `0x0000000000000000000000000000000000008006`
pub const CONTRACT_DEPLOYER_ADDRESS: Address = Address::from_bytes([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0x06,
]);

const MAX_BYTECODE_WORDS: usize = 1 << 16;

sol! {
    interface IContractDeployer {
        function create(bytes32 salt, bytes32 bytecodeHash, bytes calldata input) external payable returns (address);
        function create2(bytes32 salt, bytes32 bytecodeHash, bytes calldata input) external payable returns (address);
        function createAccount(bytes32 salt, bytes32 bytecodeHash, bytes calldata input, uint8 aaVersion) external payable returns (address);
        function create2Account(bytes32 salt, bytes32 bytecodeHash, bytes calldata input, uint8 aaVersion) external payable returns (address);
    }
}

/// Account abstraction version passed to `createAccount`/`create2Account`.
const AA_VERSION_1: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentType {
    #[default]
    Create,
    Create2,
    CreateAccount,
    Create2Account,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployParams {
    pub bytecode: Bytes,
    /// ABI-encoded constructor arguments.
    #[serde(default)]
    pub constructor_input: Bytes,
    #[serde(default)]
    pub salt: Option<H256>,
    #[serde(default)]
    pub deployment_type: DeploymentType,
    /// Additional bytecodes the deployed contract may itself deploy.
    #[serde(default)]
    pub factory_deps: Vec<Bytes>,
}

impl DeployParams {
    pub fn new(bytecode: impl Into<Bytes>) -> Self {
        Self {
            bytecode: bytecode.into(),
            ..Default::default()
        }
    }
}

/// Versioned bytecode hash used by the deployer and in `factoryDeps`:
/// `0x01 || 0x00 || length in words (u16, big endian) || sha256(bytecode)[4..]`.
pub fn hash_bytecode(bytecode: &[u8]) -> Result<H256> {
    if bytecode.len() % 32 != 0 {
        return Err(TransactionError::InvalidBytecode(format!(
            "length {} is not a multiple of 32",
            bytecode.len()
        )));
    }
    let words = bytecode.len() / 32;
    if words >= MAX_BYTECODE_WORDS {
        return Err(TransactionError::InvalidBytecode(format!("{} words is too long", words)));
    }
    if words % 2 == 0 {
        return Err(TransactionError::InvalidBytecode(format!(
            "word count {} must be odd",
            words
        )));
    }
    
    let digest = Sha256::digest(bytecode);
    let mut hash = [0u8; 32];
    hash[0] = 0x01;
    hash[2..4].copy_from_slice(&(words as u16).to_be_bytes());
    hash[4..].copy_from_slice(&digest[4..]);
    Ok(H256::from(hash))
}

/// Calldata for the contract deployer.
pub fn encode_deploy_data(params: &DeployParams) -> Result<Bytes> {
    let bytecode_hash = hash_bytecode(&params.bytecode)?.to_alloy();
    let salt = match params.deployment_type {
        DeploymentType::Create | DeploymentType::CreateAccount => H256::zero(),
        _ => params.salt.unwrap_or_default(),
    }
    .to_alloy();
    let input = params.constructor_input.to_alloy();
    
    let data = match params.deployment_type {
        DeploymentType::Create => IContractDeployer::createCall {
            salt,
            bytecodeHash: bytecode_hash,
            input,
        }
        .abi_encode(),
        DeploymentType::Create2 => IContractDeployer::create2Call {
            salt,
            bytecodeHash: bytecode_hash,
            input,
        }
        .abi_encode(),
        DeploymentType::CreateAccount => IContractDeployer::createAccountCall {
            salt,
            bytecodeHash: bytecode_hash,
            input,
            aaVersion: AA_VERSION_1,
        }
        .abi_encode(),
        DeploymentType::Create2Account => IContractDeployer::create2AccountCall {
            salt,
            bytecodeHash: bytecode_hash,
            input,
            aaVersion: AA_VERSION_1,
        }
        .abi_encode(),
    };
    Ok(Bytes::from_vec(data))
}

/// Turn `request` into a deployment of `params.bytecode`.
///
/// The request is addressed to the chain's contract deployer. The bytecode
/// and any extra dependencies are added to `factoryDeps` once each;
/// dependencies already present are left in place.
pub fn prepare_deployment(
    mut request: TransactionRequest,
    params: &DeployParams,
    chain: &ChainConfig,
) -> Result<TransactionRequest> {
    let data = encode_deploy_data(params)?;
    
    let mut deps = request.factory_deps.take().unwrap_or_default();
    for dep in std::iter::once(&params.bytecode).chain(params.factory_deps.iter()) {
        if !deps.contains(dep) {
            deps.push(dep.clone());
        }
    }
    
    debug!(
        deployment_type = ?params.deployment_type,
        deployer = %chain.contract_deployer,
        factory_deps = deps.len(),
        "Prepared contract deployment"
    );
    
    request.to = Some(chain.contract_deployer);
    request.data = Some(data);
    request.factory_deps = Some(deps);
    request.tx_type = Some(TxType::Eip712);
    Ok(request)
}
