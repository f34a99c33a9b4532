//! # reef-verify
//!
//! Best-effort submission of deployed contracts to the explorer's verification service.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod provider;
pub use provider::{
    CONTRACT_VERIFICATION_PATH, ContractVerifier, DEFAULT_VERIFICATION_DELAY, VerificationClient,
};

pub mod types;
pub use types::VerificationRequest;
