use crate::{AccountSigner, error::PrivateKeyError};
use alloy_primitives::{B256, hex::FromHex};
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English};
use eyre::{Context, Result};
use std::{fs, path::Path};

fn ensure_pk_not_env(pk: &str) -> Result<()> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return Err(PrivateKeyError::ExistsAsEnvVar(pk.to_string()).into());
    }
    Ok(())
}

/// Validates and sanitizes user inputs, returning the configured [PrivateKeySigner].
pub fn create_private_key_signer(private_key_str: &str) -> Result<PrivateKeySigner> {
    let Ok(private_key) = B256::from_hex(private_key_str.trim()) else {
        ensure_pk_not_env(private_key_str)?;
        eyre::bail!("Failed to decode private key")
    };
    match PrivateKeySigner::from_bytes(&private_key) {
        Ok(pk) => Ok(pk),
        Err(err) => {
            ensure_pk_not_env(private_key_str)?;
            eyre::bail!("Failed to create wallet from private key: {err}")
        }
    }
}

/// Creates a [PrivateKeySigner] from given mnemonic parameters.
///
/// Mnemonic can be either a file path or a mnemonic phrase.
pub fn create_mnemonic_signer(
    mnemonic: &str,
    passphrase: Option<&str>,
    hd_path: Option<&str>,
    index: u32,
) -> Result<PrivateKeySigner> {
    let mnemonic = if Path::new(mnemonic).is_file() {
        fs::read_to_string(mnemonic)
            .wrap_err_with(|| format!("failed to read mnemonic file {mnemonic}"))?
    } else {
        mnemonic.to_owned()
    };
    let mnemonic = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut builder = MnemonicBuilder::<English>::default().phrase(mnemonic.as_str());
    builder = match hd_path {
        Some(hd_path) => builder.derivation_path(hd_path)?,
        None => builder.index(index)?,
    };
    if let Some(passphrase) = passphrase {
        builder = builder.password(passphrase);
    }
    Ok(builder.build()?)
}

/// Creates named accounts from raw private keys, `Account 0`, `Account 1`, ...
pub fn accounts_from_private_keys(keys: &[String]) -> Result<Vec<AccountSigner>> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let signer = create_private_key_signer(key)
                .wrap_err_with(|| format!("invalid private key #{i}"))?;
            Ok(AccountSigner::new(format!("Account {i}"), signer))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::io::Write;

    const PHRASE: &str = "test test test test test test test test test test test junk";

    #[test]
    fn parse_private_key_signer() {
        let pk = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let signer = create_private_key_signer(pk).unwrap();
        assert_eq!(signer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));

        let signer = create_private_key_signer(&pk[2..]).unwrap();
        assert_eq!(signer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn rejects_invalid_private_key() {
        let err = create_private_key_signer("0xnothex").unwrap_err();
        assert_eq!(err.to_string(), "Failed to decode private key");
    }

    #[test]
    fn mnemonic_phrase_and_file() {
        let signer = create_mnemonic_signer(PHRASE, None, None, 1).unwrap();
        assert_eq!(signer.address(), address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  {PHRASE}  ").unwrap();
        let path = file.path().to_str().unwrap();
        let signer = create_mnemonic_signer(path, None, None, 0).unwrap();
        assert_eq!(signer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn names_accounts_by_position() {
        let keys = vec![
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
            "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d".to_string(),
        ];
        let accounts = accounts_from_private_keys(&keys).unwrap();
        assert_eq!(accounts[0].name, "Account 0");
        assert_eq!(accounts[1].name, "Account 1");
        assert_eq!(accounts[1].evm_address, address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));

        let err = accounts_from_private_keys(&["0x01".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "invalid private key #0");
    }
}
