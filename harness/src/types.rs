//! Typed views over the records returned by the chain client.

use cosmrs::proto::{
    cosmos::{base::abci::v1beta1::TxResponse, tx::v1beta1::Tx},
    cosmwasm::wasm::v1::{MsgInstantiateContract, MsgStoreCode},
};
use cosmrs::Any;
use prost::Message;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::error::Result;

/// result code the chain reports for a successful transaction
pub const TX_SUCCESS_CODE: u32 = 0;

pub const STORE_CODE_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgStoreCode";
pub const INSTANTIATE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";

const REDACTED: &str = "redacted";

/// a field that is either present or blanked out for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redactable<T> {
    Value(T),
    Redacted,
}

impl<T> Redactable<T> {
    pub fn is_redacted(&self) -> bool {
        matches!(self, Redactable::Redacted)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Redactable::Value(v) => Some(v),
            Redactable::Redacted => None,
        }
    }
}

impl<T: Serialize> Serialize for Redactable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Redactable::Value(v) => v.serialize(serializer),
            Redactable::Redacted => serializer.serialize_str(REDACTED),
        }
    }
}

/// event attribute as emitted by the node, key and value as raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawAttribute {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// event attribute after its bytes were decoded, displayed as `{ key: value }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAttribute {
    pub key: String,
    pub value: String,
}

impl Serialize for DecodedAttribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

/// Interprets every byte as one character code and concatenates them.
pub fn decode_char_codes(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

impl RawAttribute {
    pub fn decode(&self) -> DecodedAttribute {
        DecodedAttribute {
            key: decode_char_codes(&self.key),
            value: decode_char_codes(&self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attributes {
    Raw(Vec<RawAttribute>),
    Decoded(Vec<DecodedAttribute>),
}

impl Attributes {
    /// decoded form of the attributes, leaving already decoded ones as they are
    pub fn decoded(&self) -> Vec<DecodedAttribute> {
        match self {
            Attributes::Raw(raw) => raw.iter().map(RawAttribute::decode).collect(),
            Attributes::Decoded(decoded) => decoded.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum TxMessage {
    StoreCode {
        sender: String,
        wasm_byte_code: Redactable<Vec<u8>>,
    },
    InstantiateContract {
        sender: String,
        admin: String,
        code_id: u64,
        label: String,
        msg: serde_json::Value,
        funds: Vec<String>,
    },
    Other {
        type_url: String,
        value: Vec<u8>,
    },
}

impl TxMessage {
    pub fn from_any(any: &Any) -> Result<Self> {
        let msg = match any.type_url.as_str() {
            STORE_CODE_TYPE_URL => {
                let msg = MsgStoreCode::decode(any.value.as_slice())?;
                TxMessage::StoreCode {
                    sender: msg.sender,
                    wasm_byte_code: Redactable::Value(msg.wasm_byte_code),
                }
            }
            INSTANTIATE_CONTRACT_TYPE_URL => {
                let msg = MsgInstantiateContract::decode(any.value.as_slice())?;
                let init_msg = serde_json::from_slice(&msg.msg).unwrap_or_else(|_| {
                    serde_json::Value::String(String::from_utf8_lossy(&msg.msg).into_owned())
                });
                TxMessage::InstantiateContract {
                    sender: msg.sender,
                    admin: msg.admin,
                    code_id: msg.code_id,
                    label: msg.label,
                    msg: init_msg,
                    funds: msg
                        .funds
                        .into_iter()
                        .map(|c| format!("{}{}", c.amount, c.denom))
                        .collect(),
                }
            }
            other => TxMessage::Other {
                type_url: other.to_string(),
                value: any.value.clone(),
            },
        };

        Ok(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxBodyView {
    pub messages: Vec<TxMessage>,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxView {
    pub body: TxBodyView,
    /// protobuf encoded `AuthInfo`
    pub auth_info: Redactable<Vec<u8>>,
}

impl TxView {
    pub fn from_proto(tx: Tx) -> Result<Self> {
        let body = tx.body.unwrap_or_default();
        let messages = body
            .messages
            .iter()
            .map(TxMessage::from_any)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            body: TxBodyView {
                messages,
                memo: body.memo,
            },
            auth_info: Redactable::Value(tx.auth_info.unwrap_or_default().encode_to_vec()),
        })
    }
}

/// outcome of a broadcast transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxResult {
    pub tx_hash: String,
    pub height: i64,
    pub code: u32,
    pub codespace: String,
    pub raw_log: String,
    pub gas_wanted: i64,
    pub gas_used: i64,
    pub events: Vec<Event>,
    pub tx_bytes: Redactable<Vec<u8>>,
    pub tx: Option<TxView>,
}

impl TxResult {
    pub fn from_proto(response: TxResponse, tx: Option<Tx>, tx_bytes: Vec<u8>) -> Result<Self> {
        let events = response
            .events
            .iter()
            .map(|e| Event {
                kind: e.r#type.clone(),
                attributes: Attributes::Raw(
                    e.attributes
                        .iter()
                        .map(|a| RawAttribute {
                            key: AsRef::<[u8]>::as_ref(&a.key).to_vec(),
                            value: AsRef::<[u8]>::as_ref(&a.value).to_vec(),
                        })
                        .collect(),
                ),
            })
            .collect();

        Ok(Self {
            tx_hash: response.txhash,
            height: response.height,
            code: response.code,
            codespace: response.codespace,
            raw_log: response.raw_log,
            gas_wanted: response.gas_wanted,
            gas_used: response.gas_used,
            events,
            tx_bytes: Redactable::Value(tx_bytes),
            tx: tx.map(TxView::from_proto).transpose()?,
        })
    }

    pub fn is_success(&self) -> bool {
        self.code == TX_SUCCESS_CODE
    }

    /// values of every `key` attribute across events of kind `event_kind`, in emission order
    pub fn attribute_values(&self, event_kind: &str, key: &str) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.kind == event_kind)
            .flat_map(|e| e.attributes.decoded())
            .filter(|a| a.key == key)
            .map(|a| a.value)
            .collect()
    }
}

/// lifecycle state of an ibc connection or channel. only `Open` matters
/// to the pollers, every other state is reported with its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IbcState {
    Open,
    NotOpen(i32),
}

impl IbcState {
    pub fn is_open(&self) -> bool {
        matches!(self, IbcState::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSummary {
    pub connection_id: String,
    pub client_id: String,
    pub state: IbcState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub port_id: String,
    pub channel_id: String,
    pub state: IbcState,
}
