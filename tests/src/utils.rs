use anyhow::Result;
use async_trait::async_trait;
use auction_frontend::provider::{
    AuctionProvider, Connector, MemoryProvider, SharedProvider, TxOutcome,
};
use auction_frontend::reporter::NoticeBoard;
use auction_frontend::session::ProviderContext;
use auction_frontend::{create_router, AppState, Config, ExternalServiceError};
use auction_types::{Auction, AuctionId, Offer, OfferId, Uint};
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Barrier, Notify};

pub const SELLER: &str = "alice.testnet";
pub const BIDDER: &str = "bob.testnet";

/// Empty book seen from `SELLER`.
pub fn market() -> MemoryProvider {
    MemoryProvider::new(SELLER)
}

/// Auction 1: no bids, minimum price 1, ends far in the future.
pub fn market_with_auction() -> (MemoryProvider, AuctionId) {
    let market = market();
    let id = market.seed_auction(
        SELLER,
        "Brass lamp",
        "Works",
        Uint::from(4_000_000_000u64),
        Uint::from(1u64),
    );
    (market, id)
}

pub fn board() -> Arc<NoticeBoard> {
    Arc::new(NoticeBoard::new())
}

/// Router plus state around `provider`; the handshake has not run yet.
pub fn app(provider: MemoryProvider) -> (Router, Arc<AppState>) {
    app_with(Arc::new(provider))
}

pub fn app_with(provider: SharedProvider) -> (Router, Arc<AppState>) {
    let context = ProviderContext::new(FixedConnector(provider));
    let config = Config {
        contract_id: "auction.testnet".into(),
        ..Config::default()
    };
    let state = Arc::new(AppState::with_context(config, context));
    (create_router(Arc::clone(&state)), state)
}

/// Hands out whatever provider it was built with.
pub struct FixedConnector(pub SharedProvider);

#[async_trait]
impl Connector for FixedConnector {
    async fn connect(&self) -> Result<SharedProvider, ExternalServiceError> {
        Ok(Arc::clone(&self.0))
    }
}

pub fn auction_card(id: u64, name: &str) -> Auction {
    Auction {
        id: Uint::from(id),
        seller: SELLER.into(),
        name: name.into(),
        auction_end: Uint::from(4_000_000_000u64),
        minimum_offer_price: Uint::from(1u64),
        is_active: true,
        ..Auction::default()
    }
}

pub async fn body_string(response: axum::response::Response) -> Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Counts every call that reaches the wrapped provider.
pub struct CountingProvider {
    inner: SharedProvider,
    pub calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn new(inner: MemoryProvider) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuctionProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError> {
        self.hit();
        self.inner.list_auctions().await
    }

    async fn get_auction_offers(
        &self,
        auction_id: &AuctionId,
    ) -> Result<Vec<Offer>, ExternalServiceError> {
        self.hit();
        self.inner.get_auction_offers(auction_id).await
    }

    async fn get_offer(&self, offer_id: &OfferId) -> Result<Offer, ExternalServiceError> {
        self.hit();
        self.inner.get_offer(offer_id).await
    }

    async fn get_user_offers(&self, buyer: &str) -> Result<Vec<Offer>, ExternalServiceError> {
        self.hit();
        self.inner.get_user_offers(buyer).await
    }

    async fn get_user_auctions(&self, seller: &str) -> Result<Vec<Auction>, ExternalServiceError> {
        self.hit();
        self.inner.get_user_auctions(seller).await
    }

    async fn create_offer(
        &self,
        auction_id: &AuctionId,
        amount: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError> {
        self.hit();
        self.inner.create_offer(auction_id, amount).await
    }

    async fn trade(&self, auction_id: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        self.hit();
        self.inner.trade(auction_id).await
    }

    async fn cancel_auction(
        &self,
        auction_id: &AuctionId,
    ) -> Result<TxOutcome, ExternalServiceError> {
        self.hit();
        self.inner.cancel_auction(auction_id).await
    }
}

/// Reads park until `release` is notified, then fail. Writes pass through.
pub struct GatedProvider {
    inner: MemoryProvider,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedProvider {
    pub fn new(inner: MemoryProvider) -> Self {
        Self {
            inner,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    async fn gate(&self, method: &'static str) -> ExternalServiceError {
        self.entered.notify_one();
        self.release.notified().await;
        ExternalServiceError::new(method, "arrived late")
    }
}

#[async_trait]
impl AuctionProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError> {
        Err(self.gate("get_auctions").await)
    }

    async fn get_auction_offers(&self, _: &AuctionId) -> Result<Vec<Offer>, ExternalServiceError> {
        Err(self.gate("get_auction_offers").await)
    }

    async fn get_offer(&self, _: &OfferId) -> Result<Offer, ExternalServiceError> {
        Err(self.gate("get_offer").await)
    }

    async fn get_user_offers(&self, _: &str) -> Result<Vec<Offer>, ExternalServiceError> {
        Err(self.gate("get_user_offers").await)
    }

    async fn get_user_auctions(&self, _: &str) -> Result<Vec<Auction>, ExternalServiceError> {
        Err(self.gate("get_user_auctions").await)
    }

    async fn create_offer(
        &self,
        auction_id: &AuctionId,
        amount: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError> {
        self.inner.create_offer(auction_id, amount).await
    }

    async fn trade(&self, auction_id: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        self.inner.trade(auction_id).await
    }

    async fn cancel_auction(
        &self,
        auction_id: &AuctionId,
    ) -> Result<TxOutcome, ExternalServiceError> {
        self.inner.cancel_auction(auction_id).await
    }
}

/// Canned answers in a fixed order. Methods listed in `failures` fail with
/// their message. With a barrier set, every read waits on it first.
pub struct ScriptedProvider {
    auctions: Vec<Auction>,
    failures: Vec<(&'static str, &'static str)>,
    barrier: Option<Arc<Barrier>>,
}

impl ScriptedProvider {
    pub fn new(auctions: Vec<Auction>) -> Self {
        Self {
            auctions,
            failures: Vec::new(),
            barrier: None,
        }
    }

    pub fn failing(mut self, method: &'static str, message: &'static str) -> Self {
        self.failures.push((method, message));
        self
    }

    pub fn in_step(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    async fn read<T>(&self, method: &'static str, value: T) -> Result<T, ExternalServiceError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        match self.failures.iter().find(|(m, _)| *m == method) {
            Some((_, message)) => Err(ExternalServiceError::new(method, *message)),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl AuctionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError> {
        self.read("get_auctions", self.auctions.clone()).await
    }

    async fn get_auction_offers(&self, _: &AuctionId) -> Result<Vec<Offer>, ExternalServiceError> {
        self.read("get_auction_offers", Vec::new()).await
    }

    async fn get_offer(&self, _: &OfferId) -> Result<Offer, ExternalServiceError> {
        self.read("get_offer", Offer::default()).await
    }

    async fn get_user_offers(&self, _: &str) -> Result<Vec<Offer>, ExternalServiceError> {
        self.read("get_user_offers", Vec::new()).await
    }

    async fn get_user_auctions(&self, seller: &str) -> Result<Vec<Auction>, ExternalServiceError> {
        let mine = self.auctions.iter().filter(|a| a.seller == seller).cloned().collect();
        self.read("get_user_auctions", mine).await
    }

    async fn create_offer(
        &self,
        _: &AuctionId,
        _: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError> {
        Err(ExternalServiceError::new("create_offer", "read-only"))
    }

    async fn trade(&self, _: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        Err(ExternalServiceError::new("trade", "read-only"))
    }

    async fn cancel_auction(&self, _: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        Err(ExternalServiceError::new("cancel_auction", "read-only"))
    }
}
