use clap::Parser;
use eyre::Result;
use itertools::Itertools;
use reef_cli::utils;
use reef_common::CompiledContracts;
use reef_config::Config;
use serde::Serialize;
use std::path::PathBuf;
use yansi::Paint;

/// CLI arguments for `reefdeploy contracts`.
#[derive(Clone, Debug, Parser)]
pub struct ContractsArgs {
    /// Compiled contracts JSON file. Defaults to the configured `artifacts` path.
    #[arg(value_name = "ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Print the contracts as JSON.
    #[arg(long, short)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractEntry<'a> {
    name: &'a str,
    filename: &'a str,
    compiler_version: &'a str,
    constructor: Option<String>,
    default: bool,
}

impl ContractsArgs {
    pub fn run(self) -> Result<()> {
        let path = match self.artifacts {
            Some(path) => path,
            None => Config::load()?.artifacts,
        };
        let contracts = CompiledContracts::load(&path)?;
        let entries = entries(&contracts);

        if self.json {
            return utils::print_json(&entries);
        }
        if entries.is_empty() {
            println!("No compiled contracts in {}", path.display());
            return Ok(());
        }
        for entry in &entries {
            let marker = if entry.default { "*" } else { " " };
            let constructor = entry.constructor.as_deref().unwrap_or("constructor()");
            println!(
                "{marker} {} {} {}",
                entry.name.bold(),
                entry.filename,
                constructor.dim()
            );
        }
        Ok(())
    }
}

fn entries(contracts: &CompiledContracts) -> Vec<ContractEntry<'_>> {
    let default = contracts.default_name();
    contracts
        .iter()
        .map(|(name, contract)| ContractEntry {
            name,
            filename: &contract.filename,
            compiler_version: &contract.compiler_version,
            constructor: contract.payload.abi.constructor().map(|constructor| {
                format!(
                    "constructor({})",
                    constructor.inputs.iter().map(|param| param.selector_type()).join(",")
                )
            }),
            default: Some(name) == default,
        })
        .collect()
}
