use clap::Parser;
use eyre::Result;
use figment::{
    Metadata, Profile, Provider,
    providers::Serialized,
    value::{Dict, Map},
};
use reef_config::Config;
use serde::Serialize;
use std::{path::PathBuf, time::Duration};

/// Network and explorer options shared by the commands.
///
/// Every option set here overrides `reef.toml` and `REEF_*` environment variables.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Network options")]
pub struct ReefOpts {
    /// The RPC endpoint of the chain node.
    #[arg(long = "rpc-url", short = 'r', value_name = "URL")]
    #[serde(rename = "eth_rpc_url", skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Base URL of the Reefscan explorer.
    ///
    /// Used for the contract link and as the verification endpoint. Verification is skipped
    /// when unset.
    #[arg(long, value_name = "URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reefscan_url: Option<String>,

    /// Seconds to wait after deployment before submitting the verification request.
    #[arg(long, value_name = "SECONDS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_delay: Option<u64>,
}

impl Provider for ReefOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("ReefOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::globals(self).data()
    }
}

impl ReefOpts {
    /// Loads the config with these options on top.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load_with(self.clone())?)
    }

    /// The explicitly requested verification delay, if any.
    pub fn verification_delay(&self) -> Option<Duration> {
        self.verification_delay.map(Duration::from_secs)
    }
}

/// Compiled contract selection.
#[derive(Clone, Debug, Default, Parser)]
pub struct ContractOpts {
    /// Compiled contracts JSON file, keyed by contract name.
    ///
    /// Defaults to the configured `artifacts` path.
    #[arg(value_name = "ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Name of the contract. Defaults to the first compiled contract.
    #[arg(long, short, value_name = "NAME")]
    pub contract: Option<String>,

    /// The constructor arguments, in declaration order.
    ///
    /// `true` and `false` are passed as booleans, anything else is parsed according to the
    /// constructor parameter type.
    #[arg(long, num_args(1..), allow_hyphen_values = true, value_name = "ARGS")]
    pub constructor_args: Vec<String>,
}

impl ContractOpts {
    /// The artifacts file to read, falling back to `config.artifacts`.
    pub fn artifacts_path(&self, config: &Config) -> PathBuf {
        self.artifacts.clone().unwrap_or_else(|| config.artifacts.clone())
    }
}
