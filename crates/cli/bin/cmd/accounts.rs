use alloy_primitives::U256;
use alloy_provider::ProviderBuilder;
use clap::Parser;
use eyre::{Result, WrapErr};
use reef_cli::{opts::ReefOpts, utils};
use reef_common::units::format_balance;
use reef_wallets::{AccountSigner, WalletOpts};
use serde::Serialize;
use yansi::Paint;

/// CLI arguments for `reefdeploy accounts`.
#[derive(Clone, Debug, Parser)]
pub struct AccountsArgs {
    /// Print the accounts as JSON.
    #[arg(long, short)]
    pub json: bool,

    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub reef: ReefOpts,
}

#[derive(Serialize)]
struct AccountEntry<'a> {
    name: &'a str,
    address: &'a str,
    balance: U256,
    formatted: String,
    selected: bool,
}

impl AccountsArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.reef.load_config()?;
        let mut signers = self.wallet.signers()?;
        let selected = signers.selected().map(|signer| signer.address.clone());

        let url = config.rpc_url().parse().wrap_err("invalid RPC URL")?;
        let provider = ProviderBuilder::new().connect_http(url);
        for signer in signers.iter_mut() {
            signer
                .refresh_balance(&provider)
                .await
                .wrap_err_with(|| format!("failed to fetch balance of {}", signer.address))?;
        }

        let entries = signers
            .iter()
            .map(|signer| entry(signer, selected.as_deref() == Some(signer.address.as_str())))
            .collect::<Vec<_>>();
        if self.json {
            return utils::print_json(&entries);
        }
        for entry in &entries {
            let marker = if entry.selected { "*" } else { " " };
            println!("{marker} {} {} {} REEF", entry.name.bold(), entry.address, entry.formatted);
        }
        Ok(())
    }
}

fn entry(signer: &AccountSigner, selected: bool) -> AccountEntry<'_> {
    AccountEntry {
        name: &signer.name,
        address: &signer.address,
        balance: signer.balance,
        formatted: format_balance(signer.balance),
        selected,
    }
}
