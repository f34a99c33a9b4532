use crate::args::ConstructorArg;
use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Constructor, JsonAbi};
use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use reef_common::{ArtifactError, CompiledContract};
use reef_wallets::AccountSigner;
use url::Url;

/// Errors raised while building or sending a deployment transaction.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("constructor is not defined in the ABI, but arguments were provided")]
    ConstructorError,
    #[error("constructor expects {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("constructor argument #{index} is a boolean, expected `{ty}`")]
    UnexpectedBool { index: usize, ty: String },
    #[error("invalid constructor argument #{index} for `{ty}`")]
    InvalidArgument {
        index: usize,
        ty: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },
    #[error("failed to encode constructor arguments")]
    Encoding(#[source] alloy_dyn_abi::Error),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("deployment transaction {0} reverted")]
    Reverted(TxHash),
    #[error("deployment transaction {0} did not create a contract")]
    ContractNotDeployed(TxHash),
}

/// A deployed contract and the account it is bound to.
///
/// The binding is the account's address only, the handle holds no key or provider. Callers
/// interact with the contract through the [`AccountSigner`] whose `evm_address` equals
/// [`signer`](Self::signer), and [`connect`](Self::connect) moves the binding to another account.
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedContract {
    pub address: Address,
    pub abi: JsonAbi,
    /// Address of the bound account. New transactions against the contract are sent from it.
    pub signer: Address,
    /// Hash of the creation transaction, if known.
    pub transaction_hash: Option<TxHash>,
}

impl DeployedContract {
    /// Returns the same contract bound to `signer`.
    pub fn connect(&self, signer: &AccountSigner) -> Self {
        Self { signer: signer.evm_address, ..self.clone() }
    }
}

/// Creates contracts on chain.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Deploys `contract` with the already coerced constructor `args`, signing with `signer`.
    ///
    /// `name` is only used for diagnostics.
    async fn deploy(
        &self,
        contract: &CompiledContract,
        name: &str,
        args: &[ConstructorArg],
        signer: &AccountSigner,
    ) -> Result<DeployedContract>;
}

/// Resolves `args` against the constructor parameter types.
///
/// Booleans are only accepted for `bool` parameters. Text is parsed with the parameter's
/// Solidity type, so `"5"` is a valid `uint256` and `"0xABC"` a valid `bytes`.
pub fn encode_constructor_args(
    constructor: &Constructor,
    args: &[ConstructorArg],
) -> Result<Vec<DynSolValue>, DeployError> {
    if constructor.inputs.len() != args.len() {
        return Err(DeployError::ArityMismatch {
            expected: constructor.inputs.len(),
            got: args.len(),
        });
    }

    constructor
        .inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            let invalid = |source| DeployError::InvalidArgument {
                index,
                ty: param.selector_type().into_owned(),
                source,
            };
            let ty = param.resolve().map_err(invalid)?;
            match (arg, &ty) {
                (ConstructorArg::Bool(value), DynSolType::Bool) => Ok(DynSolValue::Bool(*value)),
                (ConstructorArg::Bool(_), _) => Err(DeployError::UnexpectedBool {
                    index,
                    ty: param.selector_type().into_owned(),
                }),
                (ConstructorArg::String(value), ty) => ty.coerce_str(value).map_err(invalid),
            }
        })
        .collect()
}

/// Returns the creation code: `bytecode` followed by the ABI encoded constructor call.
pub fn deploy_code(
    abi: &JsonAbi,
    bytecode: Bytes,
    args: &[ConstructorArg],
) -> Result<Bytes, DeployError> {
    match (abi.constructor(), args.is_empty()) {
        (None, false) => Err(DeployError::ConstructorError),
        (None, true) => Ok(bytecode),
        (Some(constructor), _) => {
            let params = encode_constructor_args(constructor, args)?;
            let input = constructor.abi_encode_input(&params).map_err(DeployError::Encoding)?;
            Ok(bytecode.iter().copied().chain(input).collect())
        }
    }
}

/// [`ContractDeployer`] that sends the creation transaction over JSON-RPC.
#[derive(Clone, Debug)]
pub struct ProviderDeployer {
    rpc_url: Url,
}

impl ProviderDeployer {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let rpc_url = rpc_url.parse().wrap_err_with(|| format!("invalid RPC URL `{rpc_url}`"))?;
        Ok(Self { rpc_url })
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

#[async_trait]
impl ContractDeployer for ProviderDeployer {
    async fn deploy(
        &self,
        contract: &CompiledContract,
        name: &str,
        args: &[ConstructorArg],
        signer: &AccountSigner,
    ) -> Result<DeployedContract> {
        let bytecode = contract.bytecode(name)?;
        let code = deploy_code(&contract.abi, bytecode, args)?;

        let wallet = EthereumWallet::from(signer.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(self.rpc_url.clone());

        let tx = TransactionRequest::default().with_from(signer.evm_address).with_deploy_code(code);
        debug!(%name, from = %signer.evm_address, rpc = %self.rpc_url, "sending deployment transaction");

        let pending = provider
            .send_transaction(tx)
            .await
            .wrap_err_with(|| format!("failed to send deployment transaction for {name}"))?;
        let tx_hash = *pending.tx_hash();
        trace!(%tx_hash, "deployment transaction sent");

        let receipt = pending
            .get_receipt()
            .await
            .wrap_err_with(|| format!("failed to fetch receipt of {tx_hash}"))?;
        if !receipt.status() {
            return Err(DeployError::Reverted(tx_hash).into());
        }
        let address = receipt.contract_address().ok_or(DeployError::ContractNotDeployed(tx_hash))?;

        Ok(DeployedContract {
            address,
            abi: contract.abi.clone(),
            signer: signer.evm_address,
            transaction_hash: Some(tx_hash),
        })
    }
}
