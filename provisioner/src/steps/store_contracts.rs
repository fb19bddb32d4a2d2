use common::{ChainDeployment, SetupInputs, SetupOutputs};
use ibc_harness::{redact::to_log_json, store_contracts as store, stored_contracts};
use log::info;

use super::{account_on, read_wasm_payloads};

const CONTRACT_STORAGE: &str = "CONTRACT_STORAGE";

pub async fn store_contracts(inputs: &SetupInputs, mnemonic: &str) -> anyhow::Result<SetupOutputs> {
    let wasms = read_wasm_payloads(inputs)?;
    let mut outputs = SetupOutputs::default();

    for chain in &inputs.chains {
        let account = account_on(chain, mnemonic)?;
        info!(target: CONTRACT_STORAGE, "storing {} contract(s) on {}...", wasms.len(), chain.chain_id);

        let tx = store(&account, &wasms).await?;
        info!(target: CONTRACT_STORAGE, "store tx on {}: {}", chain.chain_id, to_log_json(&tx));

        let contracts = stored_contracts(&tx);
        if contracts.len() != wasms.len() {
            anyhow::bail!(
                "expected {} stored codes on {}, found {} in tx {}",
                wasms.len(),
                chain.chain_id,
                contracts.len(),
                tx.tx_hash
            );
        }

        for contract in &contracts {
            info!(target: CONTRACT_STORAGE, "code {} stored on {} (hash {})", contract.code_id, chain.chain_id, contract.code_hash);
        }

        outputs.deployments.push(ChainDeployment {
            chain_id: chain.chain_id.clone(),
            contracts,
        });
    }

    Ok(outputs)
}
