use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("grpc transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("grpc query failed: {0}")]
    Grpc(#[from] tonic::Status),

    #[error("failed to decode protobuf message: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("failed to serialize message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid mnemonic or derivation path: {0}")]
    Key(#[from] bip32::Error),

    #[error("failed to build or sign transaction: {0}")]
    Signing(String),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("refusing to broadcast an empty batch of messages")]
    EmptyBatch,

    #[error("transaction {tx_hash} failed with code {code} ({codespace}): {raw_log}")]
    TxFailed {
        code: u32,
        codespace: String,
        raw_log: String,
        tx_hash: String,
    },

    #[error("transaction {0} was not included in a block")]
    TxNotIncluded(String),

    #[error("gave up waiting for {what} on {chain_id} after {attempts} attempts")]
    PollExhausted {
        what: &'static str,
        chain_id: String,
        attempts: u32,
    },

    #[error("invalid ibc path segment `{0}`, expected `<port>/<channel>`")]
    InvalidPathSegment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
