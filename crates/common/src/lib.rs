//! Common utilities shared by the reef-deploy crates.

#![warn(missing_docs, unused_crate_dependencies)]

pub mod contracts;
pub mod errors;
pub mod fs;
pub mod units;

pub use contracts::*;
