use common::{artifacts_dir, SetupOutputs};
use log::info;
use std::fs;

use crate::consts::DEPLOYED_CONTRACTS_FILE;

const WRITE_OUTPUTS: &str = "WRITE_OUTPUTS";

pub fn write_setup_artifacts(outputs: &SetupOutputs) -> anyhow::Result<()> {
    let artifacts_dir = artifacts_dir();
    fs::create_dir_all(&artifacts_dir)?;

    let output_path = artifacts_dir.join(DEPLOYED_CONTRACTS_FILE);
    let outputs_str = toml::to_string(outputs)?;

    fs::write(&output_path, outputs_str)?;

    info!(target: WRITE_OUTPUTS, "deployed contracts written to {}", output_path.display());

    Ok(())
}
