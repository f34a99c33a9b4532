//! # reef-deploy
//!
//! Deploys a compiled contract, submits it for verification and reports every step to the
//! user and to the deployment state.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod args;
pub use args::{ConstructorArg, coerce_args};

pub mod factory;
pub use factory::{ContractDeployer, DeployError, DeployedContract, ProviderDeployer, deploy_code};

pub mod notify;
pub use notify::{NotificationLevel, Notifier, ShellNotifier, TracingNotifier};

pub mod orchestrator;
pub use orchestrator::{DeployRequest, DeploymentOrchestrator};

pub mod state;
pub use state::{DeploymentAction, DeploymentState, DeploymentStore, LifecycleState, StateReporter};
