#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, IbcMsg, IbcTimeout, MessageInfo, Response,
    StdError, StdResult, Storage,
};

use crate::{
    msg::{ExecuteMsg, InstantiateMsg, PacketMsg, QueryMsg},
    state::{record, LAST_OPENED_CHANNEL, LAST_OPERATION, RECEIVED_LIFE_ANSWER},
};

/// seconds before an unrelayed packet times out
pub const PACKET_LIFETIME: u64 = 60 * 60;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> StdResult<Response> {
    record(deps.storage, "Instantiate", vec![])?;

    Ok(Response::new().add_attribute("action", "instantiate"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(deps: DepsMut, env: Env, _info: MessageInfo, msg: ExecuteMsg) -> StdResult<Response> {
    let channel_id = last_opened_channel(deps.storage)?;

    let packet = match msg {
        ExecuteMsg::SendIbcPacket { message } => {
            record(
                deps.storage,
                "SendIbcPacket",
                vec![
                    format!("channel_id: {channel_id}"),
                    format!("message: {message}"),
                ],
            )?;
            PacketMsg::Message { value: message }
        }
        ExecuteMsg::RequestLifeAnswerFromOtherChain { job_id } => {
            record(
                deps.storage,
                "RequestLifeAnswer",
                vec![
                    format!("channel_id: {channel_id}"),
                    format!("job_id: {job_id}"),
                ],
            )?;
            PacketMsg::RequestLifeAnswer { job_id }
        }
    };

    Ok(Response::new()
        .add_attribute("action", "send_packet")
        .add_attribute("channel_id", &channel_id)
        .add_message(IbcMsg::SendPacket {
            channel_id,
            data: to_json_binary(&packet)?,
            timeout: IbcTimeout::with_timestamp(env.block.time.plus_seconds(PACKET_LIFETIME)),
        }))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::LastIbcOperation {} => to_json_binary(&LAST_OPERATION.load(deps.storage)?),
        QueryMsg::ViewReceivedLifeAnswer {} => {
            to_json_binary(&RECEIVED_LIFE_ANSWER.may_load(deps.storage)?)
        }
    }
}

fn last_opened_channel(storage: &dyn Storage) -> StdResult<String> {
    LAST_OPENED_CHANNEL
        .may_load(storage)?
        .ok_or_else(|| StdError::generic_err("no ibc channel has been opened yet"))
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::{
        from_json,
        testing::{message_info, mock_dependencies, mock_env},
        CosmosMsg,
    };

    use super::*;
    use crate::state::Operation;

    #[test]
    fn instantiation_is_recorded() {
        let mut deps = mock_dependencies();
        let info = message_info(&deps.api.addr_make("creator"), &[]);

        instantiate(deps.as_mut(), mock_env(), info, InstantiateMsg {}).unwrap();

        let op: Operation =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::LastIbcOperation {}).unwrap())
                .unwrap();
        assert_eq!(op.name, "Instantiate");
        assert!(op.parameters.is_empty());

        let answer: Option<u64> = from_json(
            query(deps.as_ref(), mock_env(), QueryMsg::ViewReceivedLifeAnswer {}).unwrap(),
        )
        .unwrap();
        assert_eq!(answer, None);
    }

    #[test]
    fn sending_needs_an_open_channel() {
        let mut deps = mock_dependencies();
        let info = message_info(&deps.api.addr_make("creator"), &[]);

        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::SendIbcPacket {
                message: "hello".to_string(),
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("no ibc channel"));
    }

    #[test]
    fn packets_go_out_on_the_last_opened_channel() {
        let mut deps = mock_dependencies();
        let env = mock_env();
        let info = message_info(&deps.api.addr_make("creator"), &[]);
        LAST_OPENED_CHANNEL
            .save(deps.as_mut().storage, &"channel-3".to_string())
            .unwrap();

        let res = execute(
            deps.as_mut(),
            env.clone(),
            info,
            ExecuteMsg::RequestLifeAnswerFromOtherChain {
                job_id: "job-1".to_string(),
            },
        )
        .unwrap();

        assert_eq!(res.messages.len(), 1);
        match &res.messages[0].msg {
            CosmosMsg::Ibc(IbcMsg::SendPacket {
                channel_id,
                data,
                timeout,
                ..
            }) => {
                assert_eq!(channel_id, "channel-3");
                assert_eq!(
                    from_json::<PacketMsg>(data).unwrap(),
                    PacketMsg::RequestLifeAnswer {
                        job_id: "job-1".to_string()
                    }
                );
                assert_eq!(
                    timeout,
                    &IbcTimeout::with_timestamp(env.block.time.plus_seconds(PACKET_LIFETIME))
                );
            }
            other => panic!("unexpected message {other:?}"),
        }

        let op = LAST_OPERATION.load(deps.as_ref().storage).unwrap();
        assert_eq!(op.name, "RequestLifeAnswer");
        assert_eq!(op.parameters, ["channel_id: channel-3", "job_id: job-1"]);
    }
}
