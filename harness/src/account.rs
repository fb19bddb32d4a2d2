use std::time::Duration;

use async_trait::async_trait;
use bip32::{DerivationPath, Language, Mnemonic, XPrv};
use cosmrs::proto::cosmos::auth::v1beta1::{
    query_client::QueryClient as AuthQueryClient, BaseAccount, QueryAccountRequest,
};
use cosmrs::proto::cosmos::tx::v1beta1::{
    service_client::ServiceClient as TxServiceClient, BroadcastMode, BroadcastTxRequest,
    GetTxRequest,
};
use cosmrs::{
    crypto::secp256k1::SigningKey,
    tendermint::chain,
    tx::{self, Fee, SignDoc, SignerInfo},
    Any, Coin,
};
use log::{debug, info};
use prost::Message;

use crate::{
    client::{GrpcChainClient, TxBroadcaster},
    error::{Error, Result},
    types::{TxResult, TX_SUCCESS_CODE},
};

const ACCOUNT: &str = "ACCOUNT";

/// cosmos hd path, coin type 118
pub const COSMOS_HD_PATH: &str = "m/44'/118'/0'/0/0";

const TX_POLL_INTERVAL: Duration = Duration::from_millis(500);
const TX_POLL_ATTEMPTS: u32 = 60;

/// fee parameters applied to every broadcast
#[derive(Debug, Clone)]
pub struct FeeSettings {
    pub address_prefix: String,
    pub fee_denom: String,
    pub gas_price: f64,
}

impl FeeSettings {
    fn fee_amount(&self, gas_limit: u64) -> u128 {
        (gas_limit as f64 * self.gas_price).ceil() as u128
    }
}

/// Signing account on a single chain.
///
/// Signs in direct mode with a secp256k1 key derived from a mnemonic.
pub struct Account {
    client: GrpcChainClient,
    signing_key: SigningKey,
    address: String,
    fees: FeeSettings,
}

impl Account {
    pub fn from_mnemonic(client: GrpcChainClient, mnemonic: &str, fees: FeeSettings) -> Result<Self> {
        let mnemonic = Mnemonic::new(mnemonic.trim(), Language::English)?;
        let path: DerivationPath = COSMOS_HD_PATH.parse()?;
        let seed = mnemonic.to_seed("");
        let xprv = XPrv::derive_from_path(seed.as_bytes(), &path)?;

        let signing_key = SigningKey::from_slice(xprv.private_key().to_bytes().as_slice())
            .map_err(|e| Error::Signing(e.to_string()))?;
        let address = signing_key
            .public_key()
            .account_id(&fees.address_prefix)
            .map_err(|e| Error::Signing(e.to_string()))?
            .to_string();

        info!(target: ACCOUNT, "loaded account {address} on {}", client.chain_id());

        Ok(Self {
            client,
            signing_key,
            address,
            fees,
        })
    }

    pub fn chain_id(&self) -> &str {
        self.client.chain_id()
    }

    async fn base_account(&self) -> Result<BaseAccount> {
        let mut client = AuthQueryClient::new(self.client.channel());
        let response = client
            .account(QueryAccountRequest {
                address: self.address.clone(),
            })
            .await?
            .into_inner();

        let account = BaseAccount::decode(
            response
                .account
                .ok_or(Error::MissingField("account"))?
                .value
                .as_slice(),
        )?;

        Ok(account)
    }

    async fn sign(&self, msgs: Vec<Any>, gas_limit: u64) -> Result<Vec<u8>> {
        let account = self.base_account().await?;

        let body = tx::Body::new(msgs, "", 0u32);
        let signer_info =
            SignerInfo::single_direct(Some(self.signing_key.public_key()), account.sequence);
        let fee_amount = Coin::new(self.fees.fee_amount(gas_limit), &self.fees.fee_denom)
            .map_err(|e| Error::Signing(e.to_string()))?;
        let auth_info = signer_info.auth_info(Fee::from_amount_and_gas(fee_amount, gas_limit));

        let chain_id: chain::Id = self
            .chain_id()
            .parse()
            .map_err(|e: cosmrs::tendermint::Error| Error::Signing(e.to_string()))?;

        let sign_doc = SignDoc::new(&body, &auth_info, &chain_id, account.account_number)
            .map_err(|e| Error::Signing(e.to_string()))?;

        sign_doc
            .sign(&self.signing_key)
            .and_then(|raw| raw.to_bytes())
            .map_err(|e| Error::Signing(e.to_string()))
    }

    /// polls the tx service until the transaction lands in a block
    async fn await_inclusion(&self, tx_hash: &str, tx_bytes: Vec<u8>) -> Result<TxResult> {
        let mut client = TxServiceClient::new(self.client.channel());

        for attempt in 1..=TX_POLL_ATTEMPTS {
            match client
                .get_tx(GetTxRequest {
                    hash: tx_hash.to_string(),
                })
                .await
            {
                Ok(response) => {
                    let response = response.into_inner();
                    let tx_response = response
                        .tx_response
                        .ok_or(Error::MissingField("tx_response"))?;
                    return TxResult::from_proto(tx_response, response.tx, tx_bytes);
                }
                Err(status) => {
                    debug!(target: ACCOUNT, "tx {tx_hash} not found yet (attempt {attempt}): {}", status.message());
                }
            }
            tokio::time::sleep(TX_POLL_INTERVAL).await;
        }

        Err(Error::TxNotIncluded(tx_hash.to_string()))
    }
}

#[async_trait]
impl TxBroadcaster for Account {
    fn address(&self) -> &str {
        &self.address
    }

    async fn broadcast(&self, msgs: Vec<Any>, gas_limit: u64) -> Result<TxResult> {
        let tx_bytes = self.sign(msgs, gas_limit).await?;

        let mut client = TxServiceClient::new(self.client.channel());
        let tx_response = client
            .broadcast_tx(BroadcastTxRequest {
                tx_bytes: tx_bytes.clone(),
                mode: BroadcastMode::Sync as i32,
            })
            .await?
            .into_inner()
            .tx_response
            .ok_or(Error::MissingField("tx_response"))?;

        debug!(target: ACCOUNT, "broadcast {} on {}", tx_response.txhash, self.chain_id());

        // rejected by check-tx, it will never be included
        if tx_response.code != TX_SUCCESS_CODE {
            return TxResult::from_proto(tx_response, None, tx_bytes);
        }

        self.await_inclusion(&tx_response.txhash, tx_bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn fees_round_up() {
        let fees = FeeSettings {
            address_prefix: "wasm".to_string(),
            fee_denom: "ustake".to_string(),
            gas_price: 0.0125,
        };

        assert_eq!(fees.fee_amount(300_000), 3_750);
        assert_eq!(fees.fee_amount(1), 1);
        assert_eq!(fees.fee_amount(0), 0);
    }

    #[tokio::test]
    async fn accounts_derive_from_mnemonics() {
        let client = GrpcChainClient::connect("wasmd-1", crate::client::LOCAL_GRPC_URL).unwrap();
        let fees = FeeSettings {
            address_prefix: "cosmos".to_string(),
            fee_denom: "uatom".to_string(),
            gas_price: 0.1,
        };

        let account = Account::from_mnemonic(client.clone(), TEST_MNEMONIC, fees.clone()).unwrap();
        assert_eq!(account.address(), "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4");
        assert_eq!(account.chain_id(), "wasmd-1");

        assert!(Account::from_mnemonic(client, "not a mnemonic", fees).is_err());
    }
}
