use async_trait::async_trait;
use cosmrs::proto::cosmos::base::tendermint::v1beta1::{
    service_client::ServiceClient, GetLatestBlockRequest,
};
use cosmrs::Any;
use ibc_proto::ibc::core::{
    channel::v1::{
        query_client::QueryClient as ChannelQueryClient, QueryChannelsRequest,
        State as ChannelState,
    },
    connection::v1::{
        query_client::QueryClient as ConnectionQueryClient, QueryConnectionsRequest,
        State as ConnectionState,
    },
};
use log::debug;
use tonic::transport::{Channel, Endpoint};

use crate::{
    error::{Error, Result},
    types::{ChannelSummary, ConnectionSummary, IbcState, TxResult},
};

pub(crate) const CLIENT: &str = "CLIENT";

/// gRPC endpoint of a locally running node
pub const LOCAL_GRPC_URL: &str = "http://localhost:9090";

/// read-only chain queries the pollers depend on
#[async_trait]
pub trait ChainQuerier: Send + Sync {
    /// height of the latest committed block
    async fn latest_block_height(&self) -> Result<u64>;

    /// all ibc connections known to the chain
    async fn connections(&self) -> Result<Vec<ConnectionSummary>>;

    /// all ibc channels known to the chain
    async fn channels(&self) -> Result<Vec<ChannelSummary>>;
}

/// an authenticated account able to sign and broadcast a batch of messages
#[async_trait]
pub trait TxBroadcaster: Send + Sync {
    /// bech32 address of the signer
    fn address(&self) -> &str;

    /// Broadcasts `msgs` as a single transaction and waits for its result.
    async fn broadcast(&self, msgs: Vec<Any>, gas_limit: u64) -> Result<TxResult>;
}

/// gRPC client bound to a single chain.
///
/// the underlying channel connects lazily and can be cheaply cloned.
#[derive(Debug, Clone)]
pub struct GrpcChainClient {
    chain_id: String,
    channel: Channel,
}

impl GrpcChainClient {
    pub fn connect(chain_id: &str, endpoint: &str) -> Result<Self> {
        debug!(target: CLIENT, "creating grpc client for {chain_id} at {endpoint}");
        let channel = Endpoint::from_shared(endpoint.to_string())?.connect_lazy();

        Ok(Self {
            chain_id: chain_id.to_string(),
            channel,
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub(crate) fn channel(&self) -> Channel {
        self.channel.clone()
    }
}

fn ibc_state(raw: i32, open: i32) -> IbcState {
    if raw == open {
        IbcState::Open
    } else {
        IbcState::NotOpen(raw)
    }
}

#[async_trait]
impl ChainQuerier for GrpcChainClient {
    async fn latest_block_height(&self) -> Result<u64> {
        let mut client = ServiceClient::new(self.channel());
        let response = client
            .get_latest_block(GetLatestBlockRequest {})
            .await?
            .into_inner();

        let height = response
            .block
            .ok_or(Error::MissingField("block"))?
            .header
            .ok_or(Error::MissingField("block.header"))?
            .height;

        Ok(u64::try_from(height).unwrap_or_default())
    }

    async fn connections(&self) -> Result<Vec<ConnectionSummary>> {
        let mut client = ConnectionQueryClient::new(self.channel());
        let response = client
            .connections(QueryConnectionsRequest::default())
            .await?
            .into_inner();

        Ok(response
            .connections
            .into_iter()
            .map(|c| ConnectionSummary {
                state: ibc_state(c.state, ConnectionState::Open as i32),
                connection_id: c.id,
                client_id: c.client_id,
            })
            .collect())
    }

    async fn channels(&self) -> Result<Vec<ChannelSummary>> {
        let mut client = ChannelQueryClient::new(self.channel());
        let response = client
            .channels(QueryChannelsRequest::default())
            .await?
            .into_inner();

        Ok(response
            .channels
            .into_iter()
            .map(|c| ChannelSummary {
                state: ibc_state(c.state, ChannelState::Open as i32),
                port_id: c.port_id,
                channel_id: c.channel_id,
            })
            .collect())
    }
}
