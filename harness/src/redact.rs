//! Display-friendly views of transaction results.

use crate::types::{Attributes, Event, Redactable, TxMessage, TxResult};

/// Returns a copy of `tx` fit for logging: event attributes decoded to
/// strings, and the raw tx bytes, auth info and wasm bytecode blanked out.
pub fn clean_bytes(tx: &TxResult) -> TxResult {
    let events = tx
        .events
        .iter()
        .map(|e| Event {
            kind: e.kind.clone(),
            attributes: Attributes::Decoded(e.attributes.decoded()),
        })
        .collect();

    let mut output = TxResult {
        events,
        ..tx.clone()
    };

    // these fields clutter the output too much
    output.tx_bytes = Redactable::Redacted;
    if let Some(view) = output.tx.as_mut() {
        view.auth_info = Redactable::Redacted;
        for msg in view.body.messages.iter_mut() {
            if let TxMessage::StoreCode { wasm_byte_code, .. } = msg {
                *wasm_byte_code = Redactable::Redacted;
            }
        }
    }

    output
}

/// pretty json of the cleaned result
pub fn to_log_json(tx: &TxResult) -> String {
    serde_json::to_string_pretty(&clean_bytes(tx))
        .unwrap_or_else(|e| format!("<unserializable tx {}: {e}>", tx.tx_hash))
}
