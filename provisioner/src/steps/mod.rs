mod instantiate_contracts;
mod read_input;
mod store_contracts;
mod wait_for_chains;
mod write_output;

use common::ChainInputs;
use ibc_harness::{Account, FeeSettings, GrpcChainClient};

pub use instantiate_contracts::instantiate_contracts;
pub use read_input::*;
pub use store_contracts::store_contracts;
pub use wait_for_chains::wait_for_chains;
pub use write_output::write_setup_artifacts;

/// signing account for `chain`, on a fresh client of its own
fn account_on(chain: &ChainInputs, mnemonic: &str) -> anyhow::Result<Account> {
    let client = GrpcChainClient::connect(&chain.chain_id, &chain.grpc_endpoint())?;
    let fees = FeeSettings {
        address_prefix: chain.address_prefix.clone(),
        fee_denom: chain.fee_denom.clone(),
        gas_price: chain.gas_price,
    };

    Ok(Account::from_mnemonic(client, mnemonic, fees)?)
}
