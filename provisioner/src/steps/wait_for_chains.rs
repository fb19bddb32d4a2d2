use common::{ChainInputs, SetupInputs};
use ibc_harness::{wait_for_blocks_at, wait_for_ibc_channel, wait_for_ibc_connection};
use log::info;
use tokio::task::JoinSet;

const WAIT_FOR_CHAINS: &str = "WAIT_FOR_CHAINS";

/// Polls every chain concurrently until it produces blocks and has an
/// open connection and an open `inputs.channel_id`.
pub async fn wait_for_chains(inputs: &SetupInputs) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();

    for chain in inputs.chains.iter().cloned() {
        let channel_id = inputs.channel_id.clone();
        tasks.spawn(async move { wait_for_chain(chain, channel_id).await });
    }

    while let Some(res) = tasks.join_next().await {
        res??;
    }

    info!(target: WAIT_FOR_CHAINS, "all chains are ready");
    Ok(())
}

// every helper opens its own client
async fn wait_for_chain(chain: ChainInputs, channel_id: String) -> anyhow::Result<()> {
    let endpoint = chain.grpc_endpoint();

    wait_for_blocks_at(&chain.chain_id, &endpoint).await?;
    wait_for_ibc_connection(&chain.chain_id, &endpoint).await?;
    wait_for_ibc_channel(&chain.chain_id, &endpoint, &channel_id).await?;

    Ok(())
}
