//! Polling helpers that block until a chain reaches a given state.
//!
//! Every poller issues one read-only query per attempt and sleeps for a
//! fixed interval in between. Query errors are expected while a chain or
//! relayer is still starting up; they are logged and retried, never
//! returned. A poller only fails once its attempt budget is spent.
//! Dropping the returned future (e.g. through `tokio::time::timeout`)
//! cancels it at the next suspension point.

use std::{future::Future, time::Duration};

use log::{error, info};

use crate::{
    client::{ChainQuerier, GrpcChainClient, LOCAL_GRPC_URL},
    error::{Error, Result},
};

const POLLER: &str = "POLLER";

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 5 minutes at the default interval
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// pause between two attempts
    pub interval: Duration,
    /// `None` polls until the condition holds. the condition is always
    /// checked at least once, so `Some(0)` behaves like `Some(1)`.
    pub max_attempts: Option<u32>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl PollOptions {
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

async fn poll_until<F, Fut>(
    what: &'static str,
    chain_id: &str,
    opts: &PollOptions,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let mut attempts: u32 = 0;

    loop {
        attempts = attempts.saturating_add(1);

        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => error!(target: POLLER, "{what} error on chain {chain_id}: {e}"),
        }

        if opts.is_exhausted(attempts) {
            return Err(Error::PollExhausted {
                what,
                chain_id: chain_id.to_string(),
                attempts,
            });
        }

        tokio::time::sleep(opts.interval).await;
    }
}

/// Waits until the node at [`LOCAL_GRPC_URL`] has produced its first block.
pub async fn wait_for_blocks(chain_id: &str) -> Result<()> {
    wait_for_blocks_at(chain_id, LOCAL_GRPC_URL).await
}

pub async fn wait_for_blocks_at(chain_id: &str, endpoint: &str) -> Result<()> {
    let client = GrpcChainClient::connect(chain_id, endpoint)?;
    wait_for_blocks_with(&client, chain_id, &PollOptions::default()).await
}

pub async fn wait_for_blocks_with<Q>(querier: &Q, chain_id: &str, opts: &PollOptions) -> Result<()>
where
    Q: ChainQuerier + ?Sized,
{
    info!(target: POLLER, "Waiting for blocks on {chain_id}...");

    poll_until("block", chain_id, opts, || async move {
        let height = querier.latest_block_height().await?;
        if height >= 1 {
            info!(target: POLLER, "Current block on {chain_id}: {height}");
            return Ok(true);
        }
        Ok(false)
    })
    .await
}

/// Waits until the first ibc connection reported by the chain is open.
pub async fn wait_for_ibc_connection(chain_id: &str, endpoint: &str) -> Result<()> {
    let client = GrpcChainClient::connect(chain_id, endpoint)?;
    wait_for_ibc_connection_with(&client, chain_id, &PollOptions::default()).await
}

pub async fn wait_for_ibc_connection_with<Q>(
    querier: &Q,
    chain_id: &str,
    opts: &PollOptions,
) -> Result<()>
where
    Q: ChainQuerier + ?Sized,
{
    info!(target: POLLER, "Waiting for open connections on {chain_id}...");

    poll_until("IBC connection", chain_id, opts, || async move {
        let connections = querier.connections().await?;
        match connections.first() {
            Some(c) if c.state.is_open() => {
                info!(target: POLLER, "Found an open connection on {chain_id}: {}", c.connection_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    })
    .await
}

/// Waits until `channel_id` exists on the chain and is open.
pub async fn wait_for_ibc_channel(chain_id: &str, endpoint: &str, channel_id: &str) -> Result<()> {
    let client = GrpcChainClient::connect(chain_id, endpoint)?;
    wait_for_ibc_channel_with(&client, chain_id, channel_id, &PollOptions::default()).await
}

pub async fn wait_for_ibc_channel_with<Q>(
    querier: &Q,
    chain_id: &str,
    channel_id: &str,
    opts: &PollOptions,
) -> Result<()>
where
    Q: ChainQuerier + ?Sized,
{
    info!(target: POLLER, "Waiting for {channel_id} on {chain_id}...");

    poll_until("IBC channel", chain_id, opts, || async move {
        let channels = querier.channels().await?;
        let open = channels
            .iter()
            .any(|c| c.channel_id == channel_id && c.state.is_open());
        if open {
            info!(target: POLLER, "{channel_id} is open on {chain_id}");
        }
        Ok(open)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_polls_never_run_out() {
        let opts = PollOptions::unbounded().with_interval(Duration::ZERO);

        assert!(!opts.is_exhausted(1));
        assert!(!opts.is_exhausted(u32::MAX));
        assert_eq!(u32::MAX.saturating_add(1), u32::MAX);
    }

    #[test]
    fn bounded_polls_run_out_at_the_limit() {
        let opts = PollOptions::default().with_max_attempts(3);

        assert!(!opts.is_exhausted(2));
        assert!(opts.is_exhausted(3));
        assert!(opts.is_exhausted(u32::MAX));

        // a zero budget still allows the first check
        assert!(PollOptions::default().with_max_attempts(0).is_exhausted(1));
    }
}
