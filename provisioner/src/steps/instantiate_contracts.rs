use anyhow::anyhow;
use common::{ChainDeployment, SetupInputs, SetupOutputs};
use ibc_contract::msg::InstantiateMsg;
use ibc_harness::{
    instantiate_contracts as instantiate, instantiated_contracts, redact::to_log_json, TxBroadcaster,
};
use log::info;

use super::account_on;

const CONTRACT_DEPLOYMENT: &str = "CONTRACT_DEPLOYMENT";

pub async fn instantiate_contracts(
    inputs: &SetupInputs,
    mnemonic: &str,
    stored: &SetupOutputs,
) -> anyhow::Result<SetupOutputs> {
    info!(target: CONTRACT_DEPLOYMENT, "instantiating contracts...");
    let mut outputs = SetupOutputs::default();

    for chain in &inputs.chains {
        let code = stored
            .contracts_on(&chain.chain_id)
            .ok_or_else(|| anyhow!("no stored code found for {}", chain.chain_id))?;

        let account = account_on(chain, mnemonic)?;
        info!(target: CONTRACT_DEPLOYMENT, "runner address on {}: {}", chain.chain_id, account.address());

        let tx = instantiate(&account, code, &InstantiateMsg {}).await?;
        info!(target: CONTRACT_DEPLOYMENT, "instantiate tx on {}: {}", chain.chain_id, to_log_json(&tx));

        let contracts = instantiated_contracts(&tx, code);
        if contracts.len() != code.len() {
            anyhow::bail!(
                "expected {} instances on {}, found {} in tx {}",
                code.len(),
                chain.chain_id,
                contracts.len(),
                tx.tx_hash
            );
        }

        for contract in &contracts {
            info!(target: CONTRACT_DEPLOYMENT, "contract instantiated on {}: {} (port {})", chain.chain_id, contract.address, contract.ibc_port_id);
        }

        outputs.deployments.push(ChainDeployment {
            chain_id: chain.chain_id.clone(),
            contracts,
        });
    }

    Ok(outputs)
}
