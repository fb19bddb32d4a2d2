use std::fs;

use anyhow::anyhow;
use common::{artifacts_dir, SetupOutputs};
use log::info;

use crate::{consts::STORED_CONTRACTS_FILE, PROVISIONER};

pub(crate) fn write_stored_artifacts(outputs: &SetupOutputs) -> anyhow::Result<()> {
    let dir = artifacts_dir();
    fs::create_dir_all(&dir)?;

    let path = dir.join(STORED_CONTRACTS_FILE);
    info!(target: PROVISIONER, "writing stored code artifacts to {}", path.display());
    fs::write(path, toml::to_string(outputs)?)?;
    Ok(())
}

pub(crate) fn read_stored_artifacts() -> anyhow::Result<SetupOutputs> {
    let path = artifacts_dir().join(STORED_CONTRACTS_FILE);
    let content = fs::read_to_string(path)
        .map_err(|_| anyhow!("stored code artifacts not found. run --store-contracts step first."))?;
    toml::from_str(&content).map_err(|e| anyhow!("failed to reconstruct stored code outputs: {e}"))
}
