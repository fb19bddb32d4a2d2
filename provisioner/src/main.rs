mod artifacts;
mod consts;
mod steps;

use std::env;

use clap::Parser;
use log::info;

use crate::consts::DEFAULT_INPUTS_FILE;

pub(crate) const PROVISIONER: &str = "PROVISIONER";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// inputs file under `provisioner/src/inputs/`
    #[arg(long, default_value = DEFAULT_INPUTS_FILE)]
    inputs: String,

    /// waits until every chain produces blocks and the relayer
    /// has opened a connection and the configured channel.
    ///
    /// prerequisite for the following steps:
    ///
    /// - `store_contracts`
    /// - `instantiate_contracts`
    #[arg(long)]
    wait_for_chains: bool,

    /// uploads the configured wasm payloads to every chain in a
    /// single transaction per chain.
    ///
    /// prerequisite for the following steps:
    ///
    /// - `instantiate_contracts`
    #[arg(long)]
    store_contracts: bool,

    /// instantiates the stored contracts on every chain.
    ///
    /// depends on the following steps:
    ///
    /// - `store_contracts`
    #[arg(long)]
    instantiate_contracts: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let inputs = steps::read_setup_inputs(&cli.inputs)?;

    // if no flags were specified we do e2e provisioning
    let run_all = !cli.wait_for_chains && !cli.store_contracts && !cli.instantiate_contracts;

    // nothing can be deployed before the chains and the relayer are up
    if run_all || cli.wait_for_chains {
        steps::wait_for_chains(&inputs).await?;
    }

    if run_all || cli.store_contracts {
        let mnemonic = env::var("MNEMONIC")?;
        let stored = steps::store_contracts(&inputs, &mnemonic).await?;
        artifacts::write_stored_artifacts(&stored)?;
    }

    if run_all || cli.instantiate_contracts {
        let mnemonic = env::var("MNEMONIC")?;
        let stored = artifacts::read_stored_artifacts()?;
        let deployed = steps::instantiate_contracts(&inputs, &mnemonic, &stored).await?;
        steps::write_setup_artifacts(&deployed)?;
    }

    info!(target: PROVISIONER, "provisioning done");

    Ok(())
}
