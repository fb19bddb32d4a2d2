use serde::{Deserialize, Serialize};

/// port prefix the wasm module assigns to ibc-enabled contracts
pub const WASM_PORT_PREFIX: &str = "wasm.";

/// reference to a contract deployed during a test run.
///
/// a contract starts out as stored code (`code_id` + `code_hash`) and
/// gains an address and ibc port once it has been instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub address: String,
    pub code_id: u64,
    pub ibc_port_id: String,
    pub code_hash: String,
}

impl Contract {
    /// contract whose code was stored but not yet instantiated
    pub fn stored(code_id: u64, code_hash: String) -> Self {
        Self {
            address: String::new(),
            code_id,
            ibc_port_id: String::new(),
            code_hash,
        }
    }

    /// instance of this code living at `address`
    pub fn instantiated(&self, address: String) -> Self {
        Self {
            ibc_port_id: format!("{WASM_PORT_PREFIX}{address}"),
            address,
            code_id: self.code_id,
            code_hash: self.code_hash.clone(),
        }
    }

    pub fn is_instantiated(&self) -> bool {
        !self.address.is_empty()
    }
}
