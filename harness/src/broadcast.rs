use std::time::{SystemTime, UNIX_EPOCH};

use common::Contract;
use cosmrs::proto::cosmwasm::wasm::v1::{MsgInstantiateContract, MsgStoreCode};
use cosmrs::Any;
use log::{debug, error, info};
use prost::Message;
use serde::Serialize;

use crate::{
    client::TxBroadcaster,
    error::{Error, Result},
    redact::to_log_json,
    types::{TxResult, INSTANTIATE_CONTRACT_TYPE_URL, STORE_CODE_TYPE_URL},
};

const BROADCAST: &str = "BROADCAST";

pub const STORE_CODE_GAS_LIMIT: u64 = 5_000_000;
pub const INSTANTIATE_GAS_LIMIT: u64 = 300_000;

/// Uploads every payload in `wasms` in a single transaction.
///
/// Fails with [`Error::TxFailed`] unless the chain reports success.
pub async fn store_contracts<A>(account: &A, wasms: &[Vec<u8>]) -> Result<TxResult>
where
    A: TxBroadcaster + ?Sized,
{
    let msgs = wasms
        .iter()
        .map(|wasm| Any {
            type_url: STORE_CODE_TYPE_URL.to_string(),
            value: MsgStoreCode {
                sender: account.address().to_string(),
                wasm_byte_code: wasm.clone(),
                ..Default::default()
            }
            .encode_to_vec(),
        })
        .collect();

    info!(target: BROADCAST, "storing {} contract(s) from {}", wasms.len(), account.address());
    broadcast_checked(account, msgs, STORE_CODE_GAS_LIMIT).await
}

/// Instantiates every contract in `contracts` with the same `init_msg`,
/// batched into a single transaction.
pub async fn instantiate_contracts<A, M>(
    account: &A,
    contracts: &[Contract],
    init_msg: &M,
) -> Result<TxResult>
where
    A: TxBroadcaster + ?Sized,
    M: Serialize + ?Sized,
{
    let msg = serde_json::to_vec(init_msg)?;
    let label = instantiation_label();

    let msgs = contracts
        .iter()
        .map(|contract| Any {
            type_url: INSTANTIATE_CONTRACT_TYPE_URL.to_string(),
            value: MsgInstantiateContract {
                sender: account.address().to_string(),
                code_id: contract.code_id,
                label: label.clone(),
                msg: msg.clone(),
                ..Default::default()
            }
            .encode_to_vec(),
        })
        .collect();

    info!(target: BROADCAST, "instantiating {} contract(s) as {label}", contracts.len());
    broadcast_checked(account, msgs, INSTANTIATE_GAS_LIMIT).await
}

async fn broadcast_checked<A>(account: &A, msgs: Vec<Any>, gas_limit: u64) -> Result<TxResult>
where
    A: TxBroadcaster + ?Sized,
{
    if msgs.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let tx = account.broadcast(msgs, gas_limit).await?;

    if !tx.is_success() {
        error!(target: BROADCAST, "{}", tx.raw_log);
        return Err(Error::TxFailed {
            code: tx.code,
            codespace: tx.codespace,
            raw_log: tx.raw_log,
            tx_hash: tx.tx_hash,
        });
    }

    debug!(target: BROADCAST, "{}", to_log_json(&tx));
    Ok(tx)
}

/// `v1-<unix millis>`, unique per run rather than reproducible
fn instantiation_label() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    format!("v1-{millis}")
}

/// Contracts whose code was stored by `tx`, in upload order. Each code id
/// is paired with the checksum of its own `store_code` event.
pub fn stored_contracts(tx: &TxResult) -> Vec<Contract> {
    tx.events
        .iter()
        .filter(|e| e.kind == "store_code")
        .filter_map(|e| {
            let attributes = e.attributes.decoded();
            let value_of = |key: &str| {
                attributes
                    .iter()
                    .find(|a| a.key == key)
                    .map(|a| a.value.clone())
            };

            let code_id = value_of("code_id")?.parse().ok()?;
            Some(Contract::stored(
                code_id,
                value_of("code_checksum").unwrap_or_default(),
            ))
        })
        .collect()
}

/// Instances created by `tx` out of the stored `contracts`, in message order.
pub fn instantiated_contracts(tx: &TxResult, contracts: &[Contract]) -> Vec<Contract> {
    tx.attribute_values("instantiate", "_contract_address")
        .into_iter()
        .zip(contracts)
        .map(|(address, contract)| contract.instantiated(address))
        .collect()
}
