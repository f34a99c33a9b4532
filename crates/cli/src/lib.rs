//! # reef-cli
//!
//! Shared pieces of the `reefdeploy` binary.

#[macro_use]
extern crate tracing;

pub mod handler;
pub mod opts;
pub mod utils;
