use common::{provisioner_dir, workspace_dir, SetupInputs};
use log::info;
use std::fs;

const READ_INPUTS: &str = "READ_INPUTS";

pub fn read_setup_inputs(input_file: &str) -> anyhow::Result<SetupInputs> {
    let input_path = provisioner_dir()
        .join("src")
        .join("inputs")
        .join(input_file);
    info!(target: READ_INPUTS, "reading inputs from {}...", input_path.display());

    let parameters = fs::read_to_string(input_path)?;

    let inputs: SetupInputs = toml::from_str(&parameters)?;

    info!(target: READ_INPUTS, "setup inputs: {inputs:?}");

    Ok(inputs)
}

/// wasm payloads listed in the inputs, resolved against the workspace root
pub fn read_wasm_payloads(inputs: &SetupInputs) -> anyhow::Result<Vec<Vec<u8>>> {
    inputs
        .wasm_paths
        .iter()
        .map(|path| {
            let path = workspace_dir().join(path);
            info!(target: READ_INPUTS, "reading wasm from {}", path.display());
            fs::read(&path).map_err(|e| {
                anyhow::anyhow!("failed to read {}: {e}. run `cargo wasm` first.", path.display())
            })
        })
        .collect()
}
