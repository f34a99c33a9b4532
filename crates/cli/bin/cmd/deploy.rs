use alloy_primitives::{Address, TxHash};
use clap::Parser;
use eyre::{Result, WrapErr};
use reef_cli::{
    opts::{ContractOpts, ReefOpts},
    utils,
};
use reef_common::CompiledContracts;
use reef_deploy::{
    DeployRequest, DeploymentOrchestrator, DeploymentStore, Notifier, ProviderDeployer,
    ShellNotifier, TracingNotifier,
};
use reef_verify::VerificationClient;
use reef_wallets::{WalletOpts, WalletSignerError};
use serde::Serialize;

/// CLI arguments for `reefdeploy deploy`.
#[derive(Clone, Debug, Parser)]
pub struct DeployArgs {
    #[command(flatten)]
    pub contract: ContractOpts,

    /// Print the deployment result as JSON. Progress is logged instead of printed.
    #[arg(long, short)]
    pub json: bool,

    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub reef: ReefOpts,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployOutput<'a> {
    contract: &'a str,
    deployer: Address,
    deployed_to: Address,
    transaction_hash: Option<TxHash>,
}

impl DeployArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.reef.load_config()?;
        let path = self.contract.artifacts_path(&config);
        let contracts = CompiledContracts::load(&path)?;
        let (name, contract) = contracts.select(self.contract.contract.as_deref())?;

        let signers = self.wallet.signers()?;
        let signer = signers.selected().cloned().ok_or(WalletSignerError::NoSigners)?;

        let deployer = ProviderDeployer::new(config.rpc_url())
            .wrap_err("failed to set up the contract deployer")?;
        let verifier = VerificationClient::new().with_delay(config.verification_delay());
        let orchestrator = DeploymentOrchestrator::new(deployer, verifier);

        debug!(contract = %name, artifacts = %path.display(), account = %signer.address, "deploy");

        let request = DeployRequest {
            args: self.contract.constructor_args,
            signer,
            contract_name: name.to_string(),
            reefscan_url: config.reefscan_url().map(str::to_string),
            contract: contract.clone(),
        };
        let deployer_address = request.signer.evm_address;

        let notifier: &dyn Notifier = if self.json { &TracingNotifier } else { &ShellNotifier };
        let store = DeploymentStore::new();
        let deployed = orchestrator.submit_deploy(request, notifier, &store).await;

        match deployed {
            Some(deployed) => {
                if self.json {
                    utils::print_json(&DeployOutput {
                        contract: name,
                        deployer: deployer_address,
                        deployed_to: deployed.address,
                        transaction_hash: deployed.transaction_hash,
                    })?;
                }
                Ok(())
            }
            None => {
                let error = store.last_error().unwrap_or_default();
                eyre::bail!("deployment of {name} failed: {error}")
            }
        }
    }
}
