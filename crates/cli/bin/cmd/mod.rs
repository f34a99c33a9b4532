//! `reefdeploy` subcommands.

pub mod accounts;
pub mod contracts;
pub mod deploy;
pub mod verify;
