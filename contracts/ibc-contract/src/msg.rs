use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::Operation;

#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// sends `message` over the last opened channel
    SendIbcPacket { message: String },
    /// asks the counterparty contract for the answer to life, which is
    /// stored once the acknowledgement comes back
    RequestLifeAnswerFromOtherChain { job_id: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Operation)]
    LastIbcOperation {},
    #[returns(Option<u64>)]
    ViewReceivedLifeAnswer {},
}

/// payload of packets and acknowledgements exchanged between two instances
#[cw_serde]
pub enum PacketMsg {
    Message { value: String },
    RequestLifeAnswer { job_id: String },
    ReceiveLifeAnswer { life_answer: u64 },
}
