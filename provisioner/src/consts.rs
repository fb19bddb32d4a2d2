pub(crate) const DEFAULT_INPUTS_FILE: &str = "setup_inputs.toml";

pub(crate) const STORED_CONTRACTS_FILE: &str = "stored_contracts.toml";
pub(crate) const DEPLOYED_CONTRACTS_FILE: &str = "deployed_contracts.toml";
