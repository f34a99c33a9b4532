#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error(
        "Failed to create wallet from private key. Invalid private key. But env var {0} exists. Is the `$` anchor missing?"
    )]
    ExistsAsEnvVar(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WalletSignerError {
    #[error(transparent)]
    PrivateKey(#[from] PrivateKeyError),
    #[error("no signer found for account {0}")]
    SignerNotFound(String),
    #[error("no signers configured; pass --private-key or --mnemonic")]
    NoSigners,
}
