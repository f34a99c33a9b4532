//! Deployment lifecycle state and the contract registry.

use crate::factory::DeployedContract;
use parking_lot::Mutex;
use reef_wallets::AccountSigner;

/// Where the deploy form is in its lifecycle.
///
/// `Deployed` means the last attempt finished, successfully or not. Failures are told apart by
/// [`DeploymentState::last_error`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Idle,
    Deploying,
    Deployed,
}

/// State transitions reported by the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub enum DeploymentAction {
    DeployingStarted,
    Deployed,
    ErrorOccurred(String),
    ContractAdded { name: String, contract: DeployedContract },
    ContractsCleared,
    ContractsAdded(Vec<(String, DeployedContract)>),
}

/// Receives [`DeploymentAction`]s.
pub trait StateReporter: Send + Sync {
    fn dispatch(&self, action: DeploymentAction);
}

/// Snapshot of the deployment state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeploymentState {
    pub lifecycle: LifecycleState,
    /// Message of the most recent failure, cleared when a new deployment starts.
    pub last_error: Option<String>,
    /// Deployed contracts by name, in insertion order.
    pub contracts: Vec<(String, DeployedContract)>,
}

impl DeploymentState {
    pub fn apply(&mut self, action: DeploymentAction) {
        match action {
            DeploymentAction::DeployingStarted => {
                self.lifecycle = LifecycleState::Deploying;
                self.last_error = None;
            }
            DeploymentAction::Deployed => self.lifecycle = LifecycleState::Deployed,
            DeploymentAction::ErrorOccurred(message) => self.last_error = Some(message),
            DeploymentAction::ContractAdded { name, contract } => self.upsert(name, contract),
            DeploymentAction::ContractsCleared => self.contracts.clear(),
            DeploymentAction::ContractsAdded(contracts) => {
                for (name, contract) in contracts {
                    self.upsert(name, contract);
                }
            }
        }
    }

    /// Returns the contract deployed under `name`.
    pub fn contract(&self, name: &str) -> Option<&DeployedContract> {
        self.contracts.iter().find(|(n, _)| n == name).map(|(_, contract)| contract)
    }

    fn upsert(&mut self, name: String, contract: DeployedContract) {
        match self.contracts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = contract,
            None => self.contracts.push((name, contract)),
        }
    }
}

/// Thread-safe [`StateReporter`] holding a [`DeploymentState`].
#[derive(Debug, Default)]
pub struct DeploymentStore {
    state: Mutex<DeploymentState>,
}

impl DeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DeploymentState {
        self.state.lock().clone()
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.state.lock().lifecycle
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn contract(&self, name: &str) -> Option<DeployedContract> {
        self.state.lock().contract(name).cloned()
    }

    /// Re-binds every known contract to `signer`.
    ///
    /// Used when the user picks another account, so later interactions are signed by it.
    pub fn switch_signer(&self, signer: &AccountSigner) {
        let rebound = self
            .state
            .lock()
            .contracts
            .iter()
            .map(|(name, contract)| (name.clone(), contract.connect(signer)))
            .collect::<Vec<_>>();
        debug!(account = %signer.address, contracts = rebound.len(), "switching signer");
        self.dispatch(DeploymentAction::ContractsCleared);
        self.dispatch(DeploymentAction::ContractsAdded(rebound));
    }
}

impl StateReporter for DeploymentStore {
    fn dispatch(&self, action: DeploymentAction) {
        trace!(?action, "dispatch");
        self.state.lock().apply(action);
    }
}
