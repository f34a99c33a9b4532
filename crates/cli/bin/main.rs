#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;
use reef_cli::{handler, utils};

mod args;
mod cmd;

use args::{Reef, ReefSubcommand};

fn main() -> Result<()> {
    handler::install();
    utils::subscriber();
    utils::enable_paint();
    let args = Reef::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Reef) -> Result<()> {
    match args.cmd {
        ReefSubcommand::Deploy(cmd) => cmd.run().await,
        ReefSubcommand::Verify(cmd) => cmd.run().await,
        ReefSubcommand::Accounts(cmd) => cmd.run().await,
        ReefSubcommand::Contracts(cmd) => cmd.run(),
    }
}
