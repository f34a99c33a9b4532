use crate::error::WalletSignerError;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_signer_local::PrivateKeySigner;

/// An account that can sign deployment transactions.
#[derive(Clone, Debug)]
pub struct AccountSigner {
    /// Human readable account name.
    pub name: String,
    /// Account identifier used for lookups. Compared case-sensitively.
    pub address: String,
    /// EVM address the signing key controls.
    pub evm_address: Address,
    /// Last known balance in wei.
    pub balance: U256,
    /// The signing key.
    pub signer: PrivateKeySigner,
}

impl AccountSigner {
    /// Creates an account whose identifier is the checksummed EVM address of `signer`.
    pub fn new(name: impl Into<String>, signer: PrivateKeySigner) -> Self {
        let evm_address = signer.address();
        Self {
            name: name.into(),
            address: evm_address.to_checksum(None),
            evm_address,
            balance: U256::ZERO,
            signer,
        }
    }

    /// Overrides the account identifier, e.g. with the native chain address bound to the key.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Fetches the current balance of [`Self::evm_address`] and stores it.
    pub async fn refresh_balance<P: Provider>(&mut self, provider: &P) -> eyre::Result<U256> {
        let balance = provider.get_balance(self.evm_address).await?;
        trace!(address = %self.evm_address, %balance, "refreshed balance");
        self.balance = balance;
        Ok(balance)
    }
}

/// Returns the first signer whose address matches `address` exactly.
pub fn get_signer<'a>(
    signers: &'a [AccountSigner],
    address: &str,
) -> Result<&'a AccountSigner, WalletSignerError> {
    signers
        .iter()
        .find(|signer| signer.address == address)
        .ok_or_else(|| WalletSignerError::SignerNotFound(address.to_string()))
}

/// Returns the index of the first signer whose address matches `address` exactly.
pub fn find_signer(signers: &[AccountSigner], address: &str) -> Option<usize> {
    signers.iter().position(|signer| signer.address == address)
}

/// The available accounts and the currently selected one.
#[derive(Clone, Debug, Default)]
pub struct Signers {
    signers: Vec<AccountSigner>,
    selected: Option<usize>,
}

impl Signers {
    /// Creates the collection with no account selected.
    pub fn new(signers: Vec<AccountSigner>) -> Self {
        Self { signers, selected: None }
    }

    /// See [`get_signer`].
    pub fn get_signer(&self, address: &str) -> Result<&AccountSigner, WalletSignerError> {
        get_signer(&self.signers, address)
    }

    /// Selects the account with the given address.
    pub fn select(&mut self, address: &str) -> Result<&AccountSigner, WalletSignerError> {
        let index = find_signer(&self.signers, address)
            .ok_or_else(|| WalletSignerError::SignerNotFound(address.to_string()))?;
        self.selected = Some(index);
        Ok(&self.signers[index])
    }

    /// Selects `address` if given, the first account otherwise.
    pub fn select_or_first(
        &mut self,
        address: Option<&str>,
    ) -> Result<&AccountSigner, WalletSignerError> {
        match address {
            Some(address) => self.select(address),
            None => {
                if self.signers.is_empty() {
                    return Err(WalletSignerError::NoSigners);
                }
                self.selected = Some(0);
                Ok(&self.signers[0])
            }
        }
    }

    /// The selected account, `None` until one is selected.
    pub fn selected(&self) -> Option<&AccountSigner> {
        self.selected.and_then(|index| self.signers.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountSigner> {
        self.signers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AccountSigner> {
        self.signers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, address: &str) -> AccountSigner {
        AccountSigner::new(name, PrivateKeySigner::random()).with_address(address)
    }

    #[test]
    fn finds_exact_match() {
        let signers = vec![
            account("alice", "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
            account("bob", "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty"),
        ];
        let bob = get_signer(&signers, "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty").unwrap();
        assert_eq!(bob.name, "bob");
        assert_eq!(find_signer(&signers, "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty"), Some(1));
    }

    #[test]
    fn first_match_wins() {
        let signers = vec![account("first", "0xabc"), account("second", "0xabc")];
        assert_eq!(get_signer(&signers, "0xabc").unwrap().name, "first");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let signers = vec![account("alice", "0xAbC")];
        let err = get_signer(&signers, "0xabc").unwrap_err();
        assert!(matches!(err, WalletSignerError::SignerNotFound(ref addr) if addr == "0xabc"));
        assert_eq!(err.to_string(), "no signer found for account 0xabc");
        assert_eq!(find_signer(&signers, "0xABC"), None);
    }

    #[test]
    fn default_address_is_checksummed_evm_address() {
        let key = PrivateKeySigner::random();
        let evm = key.address();
        let account = AccountSigner::new("key", key);
        assert_eq!(account.evm_address, evm);
        assert_eq!(account.address, evm.to_checksum(None));
        assert_eq!(account.balance, U256::ZERO);
    }

    #[test]
    fn selection() {
        let mut signers = Signers::new(vec![account("alice", "a"), account("bob", "b")]);
        assert!(signers.selected().is_none());

        assert_eq!(signers.select_or_first(None).unwrap().name, "alice");
        assert_eq!(signers.select("b").unwrap().name, "bob");
        assert_eq!(signers.selected().unwrap().name, "bob");

        assert!(signers.select("c").is_err());
        // a failed selection keeps the previous one
        assert_eq!(signers.selected().unwrap().name, "bob");

        assert!(matches!(
            Signers::default().select_or_first(None),
            Err(WalletSignerError::NoSigners)
        ));
    }
}
