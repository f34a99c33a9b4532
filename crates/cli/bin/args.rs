use crate::cmd::{
    accounts::AccountsArgs, contracts::ContractsArgs, deploy::DeployArgs, verify::VerifyArgs,
};
use clap::{Parser, Subcommand};

/// Deploy and verify compiled contracts on Reef chain.
#[derive(Parser)]
#[command(
    name = "reefdeploy",
    version,
    after_help = "Configuration is read from `reef.toml` and `REEF_*` environment variables.",
    next_display_order = None,
)]
pub struct Reef {
    #[command(subcommand)]
    pub cmd: ReefSubcommand,
}

#[derive(Subcommand)]
pub enum ReefSubcommand {
    /// Deploy a compiled contract and submit it for verification.
    #[command(visible_alias = "d")]
    Deploy(DeployArgs),

    /// Submit an already deployed contract for verification.
    #[command(visible_alias = "v")]
    Verify(VerifyArgs),

    /// List the configured accounts and their balances.
    #[command(visible_alias = "a")]
    Accounts(AccountsArgs),

    /// List the compiled contracts available for deployment.
    #[command(visible_alias = "c")]
    Contracts(ContractsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use clap::CommandFactory;
    use std::path::PathBuf;

    const PK: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn verify_cli() {
        Reef::command().debug_assert();
    }

    #[test]
    fn parse_deploy() {
        let args = Reef::parse_from([
            "reefdeploy",
            "deploy",
            "artifacts/contracts.json",
            "--contract",
            "Flipper",
            "--private-key",
            PK,
            "--reefscan-url",
            "https://reefscan.com",
            "--constructor-args",
            "true",
        ]);
        let ReefSubcommand::Deploy(deploy) = args.cmd else { panic!("expected deploy") };
        assert_eq!(deploy.contract.artifacts, Some(PathBuf::from("artifacts/contracts.json")));
        assert_eq!(deploy.contract.contract.as_deref(), Some("Flipper"));
        assert_eq!(deploy.contract.constructor_args, ["true"]);
        assert_eq!(deploy.wallet.private_keys, [PK]);
        assert_eq!(deploy.reef.reefscan_url.as_deref(), Some("https://reefscan.com"));
        assert!(!deploy.json);
    }

    #[test]
    fn parse_verify() {
        let args = Reef::parse_from([
            "reefdeploy",
            "verify",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--constructor-args",
            "5",
            "false",
        ]);
        let ReefSubcommand::Verify(verify) = args.cmd else { panic!("expected verify") };
        assert_eq!(verify.address, address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert_eq!(verify.contract.artifacts, None);
        assert_eq!(verify.contract.constructor_args, ["5", "false"]);
    }

    #[test]
    fn parse_accounts_and_contracts() {
        let args = Reef::parse_from(["reefdeploy", "a", "--private-key", PK, "--json"]);
        assert!(matches!(args.cmd, ReefSubcommand::Accounts(ref accounts) if accounts.json));

        let args = Reef::parse_from(["reefdeploy", "contracts", "out.json"]);
        let ReefSubcommand::Contracts(contracts) = args.cmd else { panic!("expected contracts") };
        assert_eq!(contracts.artifacts, Some(PathBuf::from("out.json")));
    }
}
