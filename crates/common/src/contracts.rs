//! Compiled contract artifacts and the registry of contracts available for deployment.

use crate::{errors::FsPathError, fs};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Bytes, hex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors returned when a compiled artifact can't be turned into deployable code, or when a
/// contract can't be picked from the registry.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The artifact carries no creation bytecode (abstract contract or interface).
    #[error("contract `{0}` has no creation bytecode; abstract contracts and interfaces can't be deployed")]
    MissingBytecode(String),
    /// The bytecode still contains library placeholders.
    #[error(
        "contract `{0}` has unlinked library references; deploy the libraries first and link them at compile time"
    )]
    UnlinkedBytecode(String),
    /// The bytecode object is not valid hex.
    #[error("invalid bytecode for contract `{name}`: {source}")]
    InvalidBytecode {
        /// contract name
        name: String,
        /// decoder error
        source: hex::FromHexError,
    },
    /// No compiled contract is registered under the requested name.
    #[error("no compiled contract named `{0}`")]
    UnknownContract(String),
    /// The registry is empty.
    #[error("no compiled contracts available")]
    Empty,
}

/// Compiler output for a single contract, as handed over by the IDE compiler.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledContract {
    /// The contract's ABI.
    pub abi: JsonAbi,
    /// EVM specific output.
    #[serde(default)]
    pub evm: EvmOutput,
    /// Raw metadata string emitted by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// The `evm` section of the compiler output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmOutput {
    /// Creation bytecode.
    #[serde(default)]
    pub bytecode: BytecodeOutput,
}

/// Creation bytecode in the compiler's hex representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytecodeOutput {
    /// Hex encoded bytecode, with or without `0x` prefix.
    #[serde(default)]
    pub object: String,
}

impl CompiledContract {
    /// Decodes the creation bytecode.
    ///
    /// `name` is only used for error messages.
    pub fn bytecode(&self, name: &str) -> Result<Bytes, ArtifactError> {
        let object = self.evm.bytecode.object.trim();
        let object = object.strip_prefix("0x").unwrap_or(object);
        if object.is_empty() {
            return Err(ArtifactError::MissingBytecode(name.to_string()));
        }
        // solc marks unresolved library addresses with `__$<hash>$__`
        if object.contains("__") {
            return Err(ArtifactError::UnlinkedBytecode(name.to_string()));
        }
        hex::decode(object)
            .map(Into::into)
            .map_err(|source| ArtifactError::InvalidBytecode { name: name.to_string(), source })
    }
}

/// A compiled contract together with everything the verification service needs to rebuild it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReefContract {
    /// Source file the contract was compiled from.
    pub filename: String,
    /// Name of the contract inside `filename`.
    pub contract_name: String,
    /// Compiler output.
    pub payload: CompiledContract,
    /// Source text submitted for verification.
    pub source: String,
    /// Compilation target, `<file>:<contract>` style.
    pub target: String,
    /// SPDX license identifier.
    pub license: String,
    /// Whether the optimizer was enabled.
    pub optimization: bool,
    /// Full compiler version string.
    pub compiler_version: String,
    /// Optimizer runs.
    pub runs: u64,
}

/// Name keyed registry of compiled contracts.
///
/// Contracts keep the order they were compiled in, which is the order of the artifacts file.
/// The first one is the default selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledContracts {
    contracts: IndexMap<String, ReefContract>,
}

impl CompiledContracts {
    /// Loads the registry from a JSON file mapping contract names to [`ReefContract`]s.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FsPathError> {
        fs::read_json_file(path)
    }

    /// Adds a contract, replacing any contract registered under the same name.
    ///
    /// A replaced contract keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, contract: ReefContract) {
        self.contracts.insert(name.into(), contract);
    }

    /// Returns the contract registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ReefContract> {
        self.contracts.get(name)
    }

    /// Contract names in selection order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    /// Iterates over `(name, contract)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReefContract)> {
        self.contracts.iter().map(|(name, contract)| (name.as_str(), contract))
    }

    /// The contract selected when the user hasn't picked one.
    pub fn default_name(&self) -> Option<&str> {
        self.names().next()
    }

    /// Resolves the requested contract, falling back to the default selection.
    pub fn select(&self, name: Option<&str>) -> Result<(&str, &ReefContract), ArtifactError> {
        match name {
            Some(name) => self
                .contracts
                .get_key_value(name)
                .map(|(name, contract)| (name.as_str(), contract))
                .ok_or_else(|| ArtifactError::UnknownContract(name.to_string())),
            None => self.iter().next().ok_or(ArtifactError::Empty),
        }
    }

    /// Number of registered contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether no contract is registered.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
