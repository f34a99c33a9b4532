use crate::{AccountSigner, Signers, utils};
use clap::Parser;
use eyre::Result;

/// Raw wallet options. Every private key and every derived mnemonic index becomes one account.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Wallet options", about = None, long_about = None)]
pub struct WalletOpts {
    /// Use the provided private key. Can be passed multiple times.
    #[arg(long = "private-key", value_name = "RAW_PRIVATE_KEY")]
    pub private_keys: Vec<String>,

    /// Use the mnemonic phrase of mnemonic file at the specified path.
    #[arg(long, alias = "mnemonic-path")]
    pub mnemonic: Option<String>,

    /// Use a BIP39 passphrase for the mnemonic.
    #[arg(long, value_name = "PASSPHRASE", requires = "mnemonic")]
    pub mnemonic_passphrase: Option<String>,

    /// Number of accounts to derive from the mnemonic, starting at index 0.
    #[arg(long, default_value_t = 1, value_name = "COUNT", requires = "mnemonic")]
    pub mnemonic_accounts: u32,

    /// The account to sign with. Defaults to the first account.
    #[arg(long, short, value_name = "ADDRESS", env = "REEF_ACCOUNT")]
    pub account: Option<String>,
}

impl WalletOpts {
    /// Builds every configured account, private keys first.
    pub fn accounts(&self) -> Result<Vec<AccountSigner>> {
        let mut accounts = utils::accounts_from_private_keys(&self.private_keys)?;
        if let Some(mnemonic) = &self.mnemonic {
            for index in 0..self.mnemonic_accounts {
                let signer = utils::create_mnemonic_signer(
                    mnemonic,
                    self.mnemonic_passphrase.as_deref(),
                    None,
                    index,
                )?;
                accounts.push(AccountSigner::new(format!("Mnemonic {index}"), signer));
            }
        }
        debug!(count = accounts.len(), "loaded accounts");
        Ok(accounts)
    }

    /// Builds the accounts and selects `--account`, or the first one.
    pub fn signers(&self) -> Result<Signers> {
        let mut signers = Signers::new(self.accounts()?);
        signers.select_or_first(self.account.as_deref())?;
        Ok(signers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WalletSignerError;

    const PK0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const PK1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn parse_repeated_keys() {
        let opts = WalletOpts::parse_from(["reef", "--private-key", PK0, "--private-key", PK1]);
        assert_eq!(opts.private_keys.len(), 2);

        let signers = opts.signers().unwrap();
        assert_eq!(signers.len(), 2);
        assert_eq!(signers.selected().unwrap().name, "Account 0");
    }

    #[test]
    fn selects_requested_account() {
        let opts = WalletOpts::parse_from([
            "reef",
            "--private-key",
            PK0,
            "--private-key",
            PK1,
            "--account",
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
        ]);
        let signers = opts.signers().unwrap();
        assert_eq!(signers.selected().unwrap().name, "Account 1");
    }

    #[test]
    fn unknown_account() {
        let opts = WalletOpts::parse_from(["reef", "--private-key", PK0, "--account", "0xdead"]);
        let err = opts.signers().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WalletSignerError>(),
            Some(WalletSignerError::SignerNotFound(_))
        ));
    }

    #[test]
    fn derives_mnemonic_accounts() {
        let opts = WalletOpts::parse_from([
            "reef",
            "--mnemonic",
            "test test test test test test test test test test test junk",
            "--mnemonic-accounts",
            "3",
        ]);
        let accounts = opts.accounts().unwrap();
        let names = accounts.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Mnemonic 0", "Mnemonic 1", "Mnemonic 2"]);
    }
}
