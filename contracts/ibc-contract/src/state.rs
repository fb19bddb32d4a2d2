use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage};
use cw_storage_plus::Item;

/// last entry point hit, with the details it was called with
#[cw_serde]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<String>,
}

pub const LAST_OPERATION: Item<Operation> = Item::new("last_operation");

pub const LAST_OPENED_CHANNEL: Item<String> = Item::new("last_opened_channel");

pub const RECEIVED_LIFE_ANSWER: Item<u64> = Item::new("received_life_answer");

pub fn record(storage: &mut dyn Storage, name: &str, parameters: Vec<String>) -> StdResult<()> {
    LAST_OPERATION.save(
        storage,
        &Operation {
            name: name.to_string(),
            parameters,
        },
    )
}
