//! # reef-wallets
//!
//! Accounts that sign deployment transactions, and the lookup used to pick one.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::{PrivateKeyError, WalletSignerError};

pub mod opts;
pub use opts::WalletOpts;

pub mod signer;
pub use signer::{AccountSigner, Signers, find_signer, get_signer};

pub mod utils;
