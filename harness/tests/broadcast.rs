use std::sync::{Mutex, Once};

use async_trait::async_trait;
use cosmrs::proto::cosmwasm::wasm::v1::{MsgInstantiateContract, MsgStoreCode};
use cosmrs::Any;
use cosmwasm_std::Empty;
use ibc_harness::{
    broadcast::{INSTANTIATE_GAS_LIMIT, STORE_CODE_GAS_LIMIT},
    instantiate_contracts, store_contracts,
    types::{Redactable, INSTANTIATE_CONTRACT_TYPE_URL, STORE_CODE_TYPE_URL},
    Contract, Error, Result, TxBroadcaster, TxResult,
};
use log::{LevelFilter, Log, Metadata, Record};
use prost::Message;

const SENDER: &str = "wasm1ap26qrlp8mcq2pg6r47w43l0y8zkqm8a450s03";

/// records every log line so tests can assert on what was reported
struct CapturedLogs(Mutex<Vec<String>>);

impl Log for CapturedLogs {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGS: CapturedLogs = CapturedLogs(Mutex::new(Vec::new()));
static INIT: Once = Once::new();

fn captured() -> &'static CapturedLogs {
    INIT.call_once(|| {
        log::set_logger(&LOGS).unwrap();
        log::set_max_level(LevelFilter::Debug);
    });
    &LOGS
}

struct MockAccount {
    reply: TxResult,
    broadcasts: Mutex<Vec<(Vec<Any>, u64)>>,
}

impl MockAccount {
    fn replying(code: u32, raw_log: &str) -> Self {
        Self {
            reply: TxResult {
                tx_hash: "9F86D081884C7D659A2FEAA0C55AD015".to_string(),
                height: 42,
                code,
                codespace: if code == 0 { "" } else { "sdk" }.to_string(),
                raw_log: raw_log.to_string(),
                gas_wanted: 0,
                gas_used: 0,
                events: vec![],
                tx_bytes: Redactable::Value(vec![1, 2, 3]),
                tx: None,
            },
            broadcasts: Mutex::new(vec![]),
        }
    }

    fn broadcasts(&self) -> Vec<(Vec<Any>, u64)> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TxBroadcaster for MockAccount {
    fn address(&self) -> &str {
        SENDER
    }

    async fn broadcast(&self, msgs: Vec<Any>, gas_limit: u64) -> Result<TxResult> {
        self.broadcasts.lock().unwrap().push((msgs, gas_limit));
        Ok(self.reply.clone())
    }
}

#[tokio::test]
async fn store_batches_every_payload_into_one_tx() {
    captured();
    let account = MockAccount::replying(0, "[]");
    let wasms = vec![b"\0asm-first".to_vec(), b"\0asm-second".to_vec()];

    let tx = store_contracts(&account, &wasms).await.unwrap();
    assert_eq!(tx.height, 42);

    let broadcasts = account.broadcasts();
    assert_eq!(broadcasts.len(), 1);

    let (msgs, gas_limit) = &broadcasts[0];
    assert_eq!(*gas_limit, STORE_CODE_GAS_LIMIT);
    assert_eq!(msgs.len(), 2);

    for (any, wasm) in msgs.iter().zip(&wasms) {
        assert_eq!(any.type_url, STORE_CODE_TYPE_URL);
        let msg = MsgStoreCode::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.sender, SENDER);
        assert_eq!(&msg.wasm_byte_code, wasm);
    }
}

#[tokio::test]
async fn instantiate_shares_init_msg_and_label() {
    captured();
    let account = MockAccount::replying(0, "[]");
    let contracts = vec![
        Contract::stored(1, "aa".to_string()),
        Contract::stored(2, "bb".to_string()),
    ];

    instantiate_contracts(&account, &contracts, &Empty {})
        .await
        .unwrap();

    let broadcasts = account.broadcasts();
    let (msgs, gas_limit) = &broadcasts[0];
    assert_eq!(*gas_limit, INSTANTIATE_GAS_LIMIT);

    let decoded: Vec<MsgInstantiateContract> = msgs
        .iter()
        .map(|any| {
            assert_eq!(any.type_url, INSTANTIATE_CONTRACT_TYPE_URL);
            MsgInstantiateContract::decode(any.value.as_slice()).unwrap()
        })
        .collect();

    assert_eq!(decoded.iter().map(|m| m.code_id).collect::<Vec<_>>(), [1u64, 2]);
    assert!(decoded.iter().all(|m| m.sender == SENDER && m.msg == b"{}"));
    assert!(decoded[0].label.starts_with("v1-"));
    assert_eq!(decoded[0].label, decoded[1].label);
}

#[tokio::test]
async fn failed_store_is_logged_then_reported() {
    let logs = captured();
    let account = MockAccount::replying(11, "out of gas in location: WriteFlat; store-code-raw-log");

    let err = store_contracts(&account, &[b"\0asm".to_vec()])
        .await
        .unwrap_err();

    match err {
        Error::TxFailed { code, raw_log, .. } => {
            assert_eq!(code, 11);
            assert!(raw_log.contains("store-code-raw-log"));
        }
        other => panic!("unexpected error {other:?}"),
    }

    let lines = logs.0.lock().unwrap();
    assert!(lines
        .iter()
        .any(|l| l.starts_with("ERROR") && l.contains("store-code-raw-log")));
}

#[tokio::test]
async fn failed_instantiate_is_logged_then_reported() {
    let logs = captured();
    let account = MockAccount::replying(2, "instantiate-raw-log: unauthorized");

    let err = instantiate_contracts(&account, &[Contract::stored(3, String::new())], &Empty {})
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TxFailed { code: 2, .. }));
    let lines = logs.0.lock().unwrap();
    assert!(lines
        .iter()
        .any(|l| l.starts_with("ERROR") && l.contains("instantiate-raw-log")));
}

#[tokio::test]
async fn empty_batches_are_never_broadcast() {
    captured();
    let account = MockAccount::replying(0, "[]");

    assert!(matches!(
        store_contracts(&account, &[]).await,
        Err(Error::EmptyBatch)
    ));
    assert!(matches!(
        instantiate_contracts(&account, &[], &Empty {}).await,
        Err(Error::EmptyBatch)
    ));
    assert!(account.broadcasts().is_empty());
}
