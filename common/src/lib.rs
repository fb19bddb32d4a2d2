use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

mod contract;

pub use contract::{Contract, WASM_PORT_PREFIX};

/// connection info for a single chain taking part in the relay setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInputs {
    // node info
    pub chain_id: String,
    pub grpc_url: String,
    pub grpc_port: String,

    // account and fees
    pub address_prefix: String,
    pub fee_denom: String,
    pub gas_price: f64,
}

impl ChainInputs {
    /// full gRPC endpoint, e.g. `http://localhost:9090`
    pub fn grpc_endpoint(&self) -> String {
        format!("{}:{}", self.grpc_url.trim_end_matches('/'), self.grpc_port)
    }
}

/// inputs of the provisioner flow, read from `provisioner/src/inputs/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupInputs {
    /// channel that the relayer is expected to open on every chain
    pub channel_id: String,

    /// wasm payloads (relative to the workspace root) stored on every chain
    pub wasm_paths: Vec<PathBuf>,

    pub chains: Vec<ChainInputs>,
}

/// contracts known on a given chain after a provisioner step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainDeployment {
    pub chain_id: String,
    pub contracts: Vec<Contract>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupOutputs {
    pub deployments: Vec<ChainDeployment>,
}

impl SetupOutputs {
    pub fn contracts_on(&self, chain_id: &str) -> Option<&[Contract]> {
        self.deployments
            .iter()
            .find(|d| d.chain_id == chain_id)
            .map(|d| d.contracts.as_slice())
    }
}

pub fn workspace_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("failed to cd to workspace root dir")
        .to_path_buf()
}

pub fn artifacts_dir() -> PathBuf {
    workspace_dir().join("artifacts")
}

pub fn provisioner_dir() -> PathBuf {
    workspace_dir().join("provisioner")
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: &str = r#"
channel_id = "channel-0"
wasm_paths = ["artifacts/ibc_contract.wasm"]

[[chains]]
chain_id = "wasmd-1"
grpc_url = "http://localhost/"
grpc_port = "9090"
address_prefix = "wasm"
fee_denom = "ustake"
gas_price = 0.1

[[chains]]
chain_id = "wasmd-2"
grpc_url = "http://localhost"
grpc_port = "9391"
address_prefix = "wasm"
fee_denom = "ustake"
gas_price = 0.1
"#;

    #[test]
    fn setup_inputs_parse_from_toml() {
        let inputs: SetupInputs = toml::from_str(INPUTS).unwrap();

        assert_eq!(inputs.channel_id, "channel-0");
        assert_eq!(inputs.chains.len(), 2);
        assert_eq!(inputs.chains[0].grpc_endpoint(), "http://localhost:9090");
        assert_eq!(inputs.chains[1].grpc_endpoint(), "http://localhost:9391");
    }

    #[test]
    fn outputs_are_looked_up_by_chain() {
        let outputs = SetupOutputs {
            deployments: vec![ChainDeployment {
                chain_id: "wasmd-1".to_string(),
                contracts: vec![Contract::stored(1, "ab".to_string())],
            }],
        };

        assert_eq!(outputs.contracts_on("wasmd-1").map(|c| c.len()), Some(1));
        assert!(outputs.contracts_on("wasmd-2").is_none());
    }
}
