//! Helpers for integration tests that deploy ibc-enabled contracts and
//! wait for a relayer to connect two chains.
//!
//! - [`denom`] derives `ibc/<HASH>` voucher denominations
//! - [`poller`] blocks until blocks, connections or channels show up
//! - [`broadcast`] stores and instantiates contracts in batched transactions
//! - [`redact`] turns transaction results into readable log output

pub mod account;
pub mod broadcast;
pub mod client;
pub mod denom;
pub mod error;
pub mod poller;
pub mod redact;
pub mod types;

pub use account::{Account, FeeSettings};
pub use broadcast::{
    instantiate_contracts, instantiated_contracts, store_contracts, stored_contracts,
};
pub use client::{ChainQuerier, GrpcChainClient, TxBroadcaster, LOCAL_GRPC_URL};
pub use denom::{denom_trace, ibc_denom, PathSegment};
pub use error::{Error, Result};
pub use poller::{
    wait_for_blocks, wait_for_blocks_at, wait_for_blocks_with, wait_for_ibc_channel,
    wait_for_ibc_channel_with, wait_for_ibc_connection, wait_for_ibc_connection_with, PollOptions,
};
pub use redact::clean_bytes;
pub use types::TxResult;

pub use common::Contract;
