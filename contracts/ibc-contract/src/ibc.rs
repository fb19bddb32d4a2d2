#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    from_json, to_json_binary, DepsMut, Env, Ibc3ChannelOpenResponse, IbcBasicResponse,
    IbcChannel, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg,
    IbcChannelOpenResponse, IbcPacket, IbcPacketAckMsg, IbcPacketReceiveMsg, IbcPacketTimeoutMsg,
    IbcReceiveResponse, StdError, StdResult,
};

use crate::{
    msg::PacketMsg,
    state::{record, LAST_OPENED_CHANNEL, RECEIVED_LIFE_ANSWER},
};

/// channel version both ends have to agree on
pub const IBC_APP_VERSION: &str = "ibc-v1";

pub const LIFE_ANSWER: u64 = 42;

fn check_version(counterparty_version: Option<&str>) -> StdResult<()> {
    match counterparty_version {
        Some(version) if version != IBC_APP_VERSION => Err(StdError::generic_err(format!(
            "counterparty version must be `{IBC_APP_VERSION}`, got `{version}`"
        ))),
        _ => Ok(()),
    }
}

fn channel_parameters(channel: &IbcChannel) -> Vec<String> {
    vec![
        format!("connection_id: {}", channel.connection_id),
        format!("channel_id: {}", channel.endpoint.channel_id),
        format!("port_id: {}", channel.endpoint.port_id),
    ]
}

fn packet_parameters(packet: &IbcPacket) -> Vec<String> {
    vec![
        format!("packet_sequence: {}", packet.sequence),
        format!("packet_data: {}", packet.data),
        format!("packet_src_port_id: {}", packet.src.port_id),
        format!("packet_src_channel_id: {}", packet.src.channel_id),
    ]
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_open(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelOpenMsg,
) -> StdResult<IbcChannelOpenResponse> {
    check_version(msg.counterparty_version())?;

    let name = if matches!(msg, IbcChannelOpenMsg::OpenInit { .. }) {
        "ChannelOpen/Init"
    } else {
        "ChannelOpen/Try"
    };
    let mut parameters = channel_parameters(msg.channel());
    if let Some(version) = msg.counterparty_version() {
        parameters.push(format!("counterparty_version: {version}"));
    }
    record(deps.storage, name, parameters)?;

    Ok(Some(Ibc3ChannelOpenResponse {
        version: IBC_APP_VERSION.to_string(),
    }))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_connect(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelConnectMsg,
) -> StdResult<IbcBasicResponse> {
    check_version(msg.counterparty_version())?;

    let name = if matches!(msg, IbcChannelConnectMsg::OpenAck { .. }) {
        "ChannelConnect/Ack"
    } else {
        "ChannelConnect/Confirm"
    };
    let channel = msg.channel();
    let mut parameters = channel_parameters(channel);
    if let Some(version) = msg.counterparty_version() {
        parameters.push(format!("counterparty_version: {version}"));
    }
    record(deps.storage, name, parameters)?;

    // outgoing packets use the most recently connected channel
    LAST_OPENED_CHANNEL.save(deps.storage, &channel.endpoint.channel_id)?;

    Ok(IbcBasicResponse::new()
        .add_attribute("action", "channel_connect")
        .add_attribute("channel_id", &channel.endpoint.channel_id))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_close(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelCloseMsg,
) -> StdResult<IbcBasicResponse> {
    let name = if matches!(msg, IbcChannelCloseMsg::CloseInit { .. }) {
        "ChannelClose/Init"
    } else {
        "ChannelClose/Confirm"
    };
    record(deps.storage, name, channel_parameters(msg.channel()))?;

    Ok(IbcBasicResponse::new().add_attribute("action", "channel_close"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_receive(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketReceiveMsg,
) -> StdResult<IbcReceiveResponse> {
    let mut parameters = packet_parameters(&msg.packet);
    parameters.push(format!("relayer: {}", msg.relayer));
    record(deps.storage, "PacketReceive", parameters)?;

    let ack = match from_json::<PacketMsg>(&msg.packet.data)? {
        PacketMsg::Message { value } => PacketMsg::Message {
            value: format!("got your message: {value}"),
        },
        PacketMsg::RequestLifeAnswer { .. } => PacketMsg::ReceiveLifeAnswer {
            life_answer: LIFE_ANSWER,
        },
        // answers only travel back as acknowledgements
        PacketMsg::ReceiveLifeAnswer { .. } => return Ok(IbcReceiveResponse::without_ack()),
    };

    Ok(IbcReceiveResponse::new(to_json_binary(&ack)?).add_attribute("action", "receive_packet"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_ack(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketAckMsg,
) -> StdResult<IbcBasicResponse> {
    let mut parameters = vec![format!("acknowledgement_data: {}", msg.acknowledgement.data)];
    parameters.extend(packet_parameters(&msg.original_packet));
    parameters.push(format!("relayer: {}", msg.relayer));
    record(deps.storage, "PacketAck", parameters)?;

    if let PacketMsg::ReceiveLifeAnswer { life_answer } =
        from_json::<PacketMsg>(&msg.acknowledgement.data)?
    {
        RECEIVED_LIFE_ANSWER.save(deps.storage, &life_answer)?;
    }

    Ok(IbcBasicResponse::new().add_attribute("action", "acknowledge_packet"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_timeout(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketTimeoutMsg,
) -> StdResult<IbcBasicResponse> {
    let mut parameters = packet_parameters(&msg.packet);
    parameters.push(format!("relayer: {}", msg.relayer));
    record(deps.storage, "PacketTimeout", parameters)?;

    Ok(IbcBasicResponse::new().add_attribute("action", "timeout_packet"))
}
