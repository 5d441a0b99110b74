//! Auction contract over NEAR JSON-RPC, with primary → fallback failover
//! and a circuit breaker.

use super::{AuctionProvider, Connector, SharedProvider, TxOutcome};
use crate::config::Config;
use crate::error::ExternalServiceError;
use crate::metrics::METRICS;
use crate::signer::WalletSigner;
use async_trait::async_trait;
use auction_types::{Auction, AuctionId, Offer, OfferId, Uint};
use near_crypto::PublicKey;
use near_gas::NearGas;
use near_jsonrpc_client::methods;
use near_jsonrpc_client::JsonRpcClient;
use near_jsonrpc_primitives::types::query::{QueryResponseKind, RpcQueryResponse};
use near_primitives::hash::CryptoHash;
use near_primitives::transaction::{Action, FunctionCallAction, SignedTransaction};
use near_primitives::types::{AccountId, BlockReference, Finality, FunctionArgs};
use near_primitives::views::{
    AccessKeyView, FinalExecutionOutcomeView, FinalExecutionStatus, QueryRequest,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const CIRCUIT_BREAKER_THRESHOLD: u64 = 5;
const CIRCUIT_BREAKER_WINDOW_MS: u64 = 30_000;

struct CircuitState {
    failures: u64,
    last_failure_ms: u64,
    open: bool,
}

/// JSON-RPC client with primary → fallback failover.
pub struct RpcClient {
    primary: JsonRpcClient,
    fallback: JsonRpcClient,
    primary_url: String,
    fallback_url: String,
    circuit: Mutex<CircuitState>,
}

impl RpcClient {
    pub fn new(primary_url: &str, fallback_url: &str) -> Self {
        info!(
            primary = primary_url,
            fallback = fallback_url,
            "RPC client initialized with failover"
        );
        Self {
            primary: JsonRpcClient::connect(primary_url),
            fallback: JsonRpcClient::connect(fallback_url),
            primary_url: primary_url.to_string(),
            fallback_url: fallback_url.to_string(),
            circuit: Mutex::new(CircuitState {
                failures: 0,
                last_failure_ms: 0,
                open: false,
            }),
        }
    }

    /// Run a `query` request. Automatic failover.
    async fn query(
        &self,
        make_request: impl Fn() -> methods::query::RpcQueryRequest,
    ) -> Result<RpcQueryResponse, crate::Error> {
        match self.active().call(make_request()).await {
            Ok(r) => {
                self.record_success();
                Ok(r)
            }
            Err(e) => {
                self.record_failure();
                warn!(error = %e, "RPC query failed, trying fallback");
                self.fallback.call(make_request()).await.map_err(|e2| {
                    crate::Error::Rpc(format!("query failed: primary={e}, fallback={e2}"))
                })
            }
        }
    }

    /// Call a contract view method and return its raw result bytes.
    pub async fn view_call(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: &Value,
    ) -> Result<Vec<u8>, crate::Error> {
        let args = serde_json::to_vec(args)
            .map_err(|e| crate::Error::Rpc(format!("unencodable args: {e}")))?;
        let make_request = || methods::query::RpcQueryRequest {
            block_reference: BlockReference::Finality(Finality::Final),
            request: QueryRequest::CallFunction {
                account_id: contract_id.clone(),
                method_name: method_name.to_string(),
                args: FunctionArgs::from(args.clone()),
            },
        };

        match self.query(make_request).await?.kind {
            QueryResponseKind::CallResult(result) => Ok(result.result),
            other => Err(crate::Error::Rpc(format!(
                "unexpected query response: {other:?}"
            ))),
        }
    }

    /// Query an access key's on-chain nonce.
    pub async fn query_access_key(
        &self,
        account_id: &AccountId,
        public_key: &PublicKey,
    ) -> Result<AccessKeyView, crate::Error> {
        let make_request = || methods::query::RpcQueryRequest {
            block_reference: BlockReference::Finality(Finality::Final),
            request: QueryRequest::ViewAccessKey {
                account_id: account_id.clone(),
                public_key: public_key.clone(),
            },
        };

        match self.query(make_request).await?.kind {
            QueryResponseKind::AccessKey(ak) => Ok(ak),
            other => Err(crate::Error::Rpc(format!(
                "unexpected query response: {other:?}"
            ))),
        }
    }

    /// Hash of the latest final block.
    pub async fn latest_block_hash(&self) -> Result<CryptoHash, crate::Error> {
        let make_request = || methods::block::RpcBlockRequest {
            block_reference: BlockReference::Finality(Finality::Final),
        };
        let block = match self.active().call(make_request()).await {
            Ok(b) => {
                self.record_success();
                b
            }
            Err(e) => {
                self.record_failure();
                warn!(error = %e, "RPC block query failed, trying fallback");
                self.fallback.call(make_request()).await.map_err(|e2| {
                    crate::Error::Rpc(format!(
                        "block query failed on both RPCs: primary={e}, fallback={e2}"
                    ))
                })?
            }
        };
        Ok(block.header.hash)
    }

    /// Send a signed transaction and wait for finality. Automatic failover.
    pub async fn send_signed_tx(
        &self,
        signed_tx: SignedTransaction,
    ) -> Result<FinalExecutionOutcomeView, crate::Error> {
        match self
            .active()
            .call(methods::broadcast_tx_commit::RpcBroadcastTxCommitRequest {
                signed_transaction: signed_tx.clone(),
            })
            .await
        {
            Ok(outcome) => {
                self.record_success();
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure();
                warn!(error = %e, "Primary broadcast_tx_commit failed, trying fallback");
                self.fallback
                    .call(methods::broadcast_tx_commit::RpcBroadcastTxCommitRequest {
                        signed_transaction: signed_tx,
                    })
                    .await
                    .map_err(|e2| {
                        crate::Error::Rpc(format!(
                            "broadcast_tx_commit failed: primary={e}, fallback={e2}"
                        ))
                    })
            }
        }
    }

    /// Quick connectivity check. Returns "ok", "degraded", or error.
    pub async fn health_check(&self) -> Result<&'static str, crate::Error> {
        let make_request = || methods::block::RpcBlockRequest {
            block_reference: BlockReference::Finality(Finality::Final),
        };
        match self.primary.call(make_request()).await {
            Ok(_) => Ok("ok"),
            Err(_) => match self.fallback.call(make_request()).await {
                Ok(_) => Ok("degraded"),
                Err(e) => Err(crate::Error::Rpc(format!("Both RPCs unreachable: {e}"))),
            },
        }
    }

    // --- Failover / circuit breaker ---

    /// Active client (primary unless circuit is open).
    fn active(&self) -> &JsonRpcClient {
        if self.is_circuit_open() {
            &self.fallback
        } else {
            &self.primary
        }
    }

    fn record_success(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if circuit.failures > 0 {
            info!(primary = %self.primary_url, "Primary RPC recovered");
            circuit.failures = 0;
            circuit.open = false;
        }
    }

    fn record_failure(&self) {
        METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        circuit.failures += 1;
        circuit.last_failure_ms = now_ms();
        if circuit.failures >= CIRCUIT_BREAKER_THRESHOLD && !circuit.open {
            circuit.open = true;
            METRICS.rpc_failovers.fetch_add(1, Ordering::Relaxed);
            warn!(
                failures = circuit.failures,
                fallback = %self.fallback_url,
                "Circuit breaker opened — routing to fallback"
            );
        }
    }

    pub fn is_circuit_open(&self) -> bool {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if !circuit.open {
            return false;
        }
        if now_ms().saturating_sub(circuit.last_failure_ms) > CIRCUIT_BREAKER_WINDOW_MS {
            circuit.open = false;
            circuit.failures = 0;
            info!(primary = %self.primary_url, "Circuit breaker half-open, retrying primary");
            return false;
        }
        true
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// The auction contract reached through [`RpcClient`].
pub struct RpcProvider {
    rpc: RpcClient,
    contract_id: AccountId,
    signer: Option<WalletSigner>,
    gas: NearGas,
    /// Serialises nonce fetch → sign → submit.
    submit_lock: tokio::sync::Mutex<()>,
}

impl RpcProvider {
    pub fn new(
        rpc: RpcClient,
        contract_id: AccountId,
        signer: Option<WalletSigner>,
        gas: NearGas,
    ) -> Self {
        Self {
            rpc,
            contract_id,
            signer,
            gas,
            submit_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn view<T: DeserializeOwned>(
        &self,
        method: &'static str,
        args: Value,
    ) -> Result<T, ExternalServiceError> {
        let bytes = self
            .rpc
            .view_call(&self.contract_id, method, &args)
            .await
            .map_err(|e| ExternalServiceError::new(method, e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ExternalServiceError::new(method, format!("undecodable result: {e}")))
    }

    async fn call(
        &self,
        method: &'static str,
        args: Value,
        deposit: u128,
    ) -> Result<TxOutcome, ExternalServiceError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            ExternalServiceError::new(method, "no signing key configured; session is read-only")
        })?;
        let fail = |e: crate::Error| ExternalServiceError::new(method, e.to_string());

        let _submit = self.submit_lock.lock().await;
        let access_key = self
            .rpc
            .query_access_key(&signer.account_id(), &signer.public_key())
            .await
            .map_err(fail)?;
        let block_hash = self.rpc.latest_block_hash().await.map_err(fail)?;

        let action = Action::FunctionCall(Box::new(FunctionCallAction {
            method_name: method.to_string(),
            args: serde_json::to_vec(&args).unwrap_or_default(),
            gas: self.gas.as_gas(),
            deposit,
        }));
        let signed_tx = signer.sign_transaction(
            access_key.nonce + 1,
            &self.contract_id,
            block_hash,
            vec![action],
        );

        let outcome = self.rpc.send_signed_tx(signed_tx).await.map_err(fail)?;
        let tx_hash = outcome.transaction_outcome.id.to_string();
        match outcome.status {
            FinalExecutionStatus::SuccessValue(_) => {
                debug!(method, tx_hash = %tx_hash, "Transaction settled");
                Ok(TxOutcome {
                    tx_hash: Some(tx_hash),
                })
            }
            FinalExecutionStatus::Failure(e) => {
                Err(ExternalServiceError::new(method, format!("{e:?}")))
            }
            FinalExecutionStatus::Started | FinalExecutionStatus::NotStarted => Err(
                ExternalServiceError::new(method, format!("transaction {tx_hash} not finalized")),
            ),
        }
    }
}

#[async_trait]
impl AuctionProvider for RpcProvider {
    fn name(&self) -> &str {
        "rpc"
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError> {
        self.view("get_auctions", json!({})).await
    }

    async fn get_auction_offers(
        &self,
        auction_id: &AuctionId,
    ) -> Result<Vec<Offer>, ExternalServiceError> {
        self.view("get_auction_offers", json!({ "auction_id": auction_id }))
            .await
    }

    async fn get_offer(&self, offer_id: &OfferId) -> Result<Offer, ExternalServiceError> {
        let offer: Option<Offer> = self.view("get_offer", json!({ "offer_id": offer_id })).await?;
        Ok(offer.unwrap_or_default())
    }

    async fn get_user_offers(&self, buyer: &str) -> Result<Vec<Offer>, ExternalServiceError> {
        self.view("get_user_offers", json!({ "account_id": buyer }))
            .await
    }

    async fn get_user_auctions(&self, seller: &str) -> Result<Vec<Auction>, ExternalServiceError> {
        self.view("get_user_auctions", json!({ "account_id": seller }))
            .await
    }

    async fn create_offer(
        &self,
        auction_id: &AuctionId,
        amount: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError> {
        let deposit = amount.to_u128().ok_or_else(|| {
            ExternalServiceError::new("create_offer", format!("amount {amount} exceeds u128"))
        })?;
        self.call("create_offer", json!({ "auction_id": auction_id }), deposit)
            .await
    }

    async fn trade(&self, auction_id: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        self.call("trade", json!({ "auction_id": auction_id }), 0)
            .await
    }

    async fn cancel_auction(
        &self,
        auction_id: &AuctionId,
    ) -> Result<TxOutcome, ExternalServiceError> {
        self.call("cancel_auction", json!({ "auction_id": auction_id }), 0)
            .await
    }
}

/// Builds an [`RpcProvider`] from config and checks the network is reachable.
pub struct RpcConnector {
    config: Config,
}

impl RpcConnector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn build(&self) -> Result<RpcProvider, crate::Error> {
        let contract_id: AccountId = self
            .config
            .contract_id
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid contract_id: {e}")))?;
        let signer = WalletSigner::load(&self.config)?;
        if signer.is_none() {
            warn!("No signing key configured — commands will be rejected (read-only)");
        }

        let rpc = RpcClient::new(&self.config.rpc_url, &self.config.fallback_rpc_url);
        let status = rpc.health_check().await?;
        info!(contract = %contract_id, rpc = status, "RPC handshake complete");

        Ok(RpcProvider::new(
            rpc,
            contract_id,
            signer,
            NearGas::from_tgas(self.config.gas_tgas),
        ))
    }
}

#[async_trait]
impl Connector for RpcConnector {
    async fn connect(&self) -> Result<SharedProvider, ExternalServiceError> {
        let provider = self.build().await?;
        Ok(Arc::new(provider))
    }
}
