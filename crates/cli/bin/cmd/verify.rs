use alloy_primitives::Address;
use clap::Parser;
use eyre::{OptionExt, Result};
use reef_cli::opts::{ContractOpts, ReefOpts};
use reef_common::CompiledContracts;
use reef_deploy::{Notifier, ShellNotifier, orchestrator::verification_message};
use reef_verify::{ContractVerifier, VerificationClient};

/// CLI arguments for `reefdeploy verify`.
#[derive(Clone, Debug, Parser)]
pub struct VerifyArgs {
    /// The address of the deployed contract.
    #[arg(value_name = "ADDRESS")]
    pub address: Address,

    #[command(flatten)]
    pub contract: ContractOpts,

    #[command(flatten)]
    pub reef: ReefOpts,
}

impl VerifyArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.reef.load_config()?;
        let url = config
            .reefscan_url()
            .ok_or_eyre("no Reefscan URL configured, set `--reefscan-url` or `reefscan_url`")?;
        let contracts = CompiledContracts::load(self.contract.artifacts_path(&config))?;
        let (name, contract) = contracts.select(self.contract.contract.as_deref())?;

        // the contract is already on chain, only wait when asked to
        let delay = self.reef.verification_delay().unwrap_or_default();
        let client = VerificationClient::new().with_delay(delay);

        debug!(contract = %name, address = %self.address, %url, "verify");
        let verified = client
            .verify_contract(self.address, contract, &self.contract.constructor_args, Some(url))
            .await;
        ShellNotifier.info(&verification_message(&contract.contract_name, verified));

        if !verified {
            eyre::bail!("verification of {name} at {} was not accepted", self.address);
        }
        Ok(())
    }
}
