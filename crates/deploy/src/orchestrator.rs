use crate::{
    args::coerce_args,
    factory::{ContractDeployer, DeployedContract},
    notify::Notifier,
    state::{DeploymentAction, StateReporter},
};
use alloy_primitives::Address;
use eyre::Result;
use reef_common::{ReefContract, errors::display_chain};
use reef_verify::ContractVerifier;
use reef_wallets::AccountSigner;
use tokio::sync::Mutex;

/// Everything needed to deploy one contract.
#[derive(Clone, Debug)]
pub struct DeployRequest {
    /// Raw constructor arguments in declaration order.
    pub args: Vec<String>,
    pub signer: AccountSigner,
    /// Registry key the deployed contract is recorded under.
    pub contract_name: String,
    /// Explorer base URL. Enables the contract link and verification, an empty URL counts as
    /// unset.
    pub reefscan_url: Option<String>,
    pub contract: ReefContract,
}

/// Runs the deploy, notify, verify, notify workflow.
///
/// Submissions are serialized: a second call waits until the first one has reported its final
/// state, so the lifecycle never interleaves.
#[derive(Debug)]
pub struct DeploymentOrchestrator<D, V> {
    deployer: D,
    verifier: V,
    lock: Mutex<()>,
}

impl<D: ContractDeployer, V: ContractVerifier> DeploymentOrchestrator<D, V> {
    pub fn new(deployer: D, verifier: V) -> Self {
        Self { deployer, verifier, lock: Mutex::new(()) }
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Deploys and verifies `request.contract`, reporting progress to `notifier` and `reporter`.
    ///
    /// Never fails: any error is turned into an error notification and an
    /// [`DeploymentAction::ErrorOccurred`]. Every call ends with [`DeploymentAction::Deployed`].
    /// Returns the deployed contract on success.
    pub async fn submit_deploy(
        &self,
        request: DeployRequest,
        notifier: &dyn Notifier,
        reporter: &dyn StateReporter,
    ) -> Option<DeployedContract> {
        let _guard = self.lock.lock().await;

        reporter.dispatch(DeploymentAction::DeployingStarted);
        notifier.info(&deploying_message(&request.contract_name));

        match self.deploy_and_verify(&request, notifier).await {
            Ok(contract) => {
                reporter.dispatch(DeploymentAction::ContractAdded {
                    name: request.contract_name.clone(),
                    contract: contract.clone(),
                });
                reporter.dispatch(DeploymentAction::Deployed);
                Some(contract)
            }
            Err(err) => {
                let message = display_chain(err.as_ref());
                error!(contract = %request.contract_name, %message, "deployment failed");
                notifier.error(&failure_message(&message));
                reporter.dispatch(DeploymentAction::ErrorOccurred(message));
                reporter.dispatch(DeploymentAction::Deployed);
                None
            }
        }
    }

    async fn deploy_and_verify(
        &self,
        request: &DeployRequest,
        notifier: &dyn Notifier,
    ) -> Result<DeployedContract> {
        let contract = &request.contract;
        let args = coerce_args(&request.args);
        debug!(name = %contract.contract_name, ?args, signer = %request.signer.address, "deploying");

        let deployed = self
            .deployer
            .deploy(&contract.payload, &contract.contract_name, &args, &request.signer)
            .await?;
        let url = request.reefscan_url.as_deref().filter(|url| !url.is_empty());
        notifier.info(&deployed_message(&contract.contract_name, deployed.address, url));

        let verified =
            self.verifier.verify_contract(deployed.address, contract, &request.args, url).await;
        notifier.info(&verification_message(&contract.contract_name, verified));

        Ok(deployed)
    }
}

fn deploying_message(name: &str) -> String {
    format!("Deploying {name} contract...")
}

fn deployed_message(name: &str, address: Address, reefscan_url: Option<&str>) -> String {
    let mut message = format!("Contract {name} deployed successfully at address: {address}");
    if let Some(url) = reefscan_url {
        message.push_str(&format!(
            "<br>Check the status of the contract at <a href={url}/contract/{address} target=\"_blank\">Reefscan URL</a>"
        ));
    }
    message
}

/// Result line of a verification attempt, shared with the standalone `verify` command.
pub fn verification_message(name: &str, verified: bool) -> String {
    let not = if verified { "" } else { " not" };
    format!("<br>Contract {name} was{not} verified!")
}

fn failure_message(error: &str) -> String {
    format!("Something went wrong... Error: {error}")
}
