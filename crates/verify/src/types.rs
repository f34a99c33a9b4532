use alloy_primitives::Address;
use reef_common::ReefContract;
use serde::{Deserialize, Serialize};

/// Body of a verification submission.
///
/// Flattened from the deployed address, the compiled contract's metadata and the constructor
/// arguments exactly as the user entered them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub address: String,
    /// JSON encoded array of the raw constructor arguments.
    pub arguments: String,
    pub name: String,
    pub filename: String,
    pub target: String,
    pub source: String,
    pub optimization: bool,
    pub compiler_version: String,
    pub license: String,
    pub runs: u64,
}

impl VerificationRequest {
    /// Builds the body for the contract deployed at `address` with constructor `args`.
    pub fn new(
        address: Address,
        contract: &ReefContract,
        args: &[String],
    ) -> serde_json::Result<Self> {
        Ok(Self {
            address: address.to_checksum(None),
            arguments: serde_json::to_string(args)?,
            name: contract.contract_name.clone(),
            filename: contract.filename.clone(),
            target: contract.target.clone(),
            source: contract.source.clone(),
            optimization: contract.optimization,
            compiler_version: contract.compiler_version.clone(),
            license: contract.license.clone(),
            runs: contract.runs,
        })
    }
}
