//! The auction service as the frontend sees it: a fixed method set behind
//! a trait object. All state lives on the other side.

mod memory;
mod rpc;

pub use memory::{MemoryConnector, MemoryProvider};
pub use rpc::{RpcConnector, RpcProvider};

use crate::error::ExternalServiceError;
use async_trait::async_trait;
use auction_types::{Auction, AuctionId, Offer, OfferId, Uint};
use std::sync::Arc;

/// Settled transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: Option<String>,
}

#[async_trait]
pub trait AuctionProvider: Send + Sync {
    /// Short label for logs and the health endpoint.
    fn name(&self) -> &str;

    async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError>;

    async fn get_auction_offers(
        &self,
        auction_id: &AuctionId,
    ) -> Result<Vec<Offer>, ExternalServiceError>;

    /// Unknown ids resolve to `Offer::default()`, not an error.
    async fn get_offer(&self, offer_id: &OfferId) -> Result<Offer, ExternalServiceError>;

    async fn get_user_offers(&self, buyer: &str) -> Result<Vec<Offer>, ExternalServiceError>;

    async fn get_user_auctions(&self, seller: &str) -> Result<Vec<Auction>, ExternalServiceError>;

    /// `amount` is attached as the call's value transfer.
    async fn create_offer(
        &self,
        auction_id: &AuctionId,
        amount: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError>;

    async fn trade(&self, auction_id: &AuctionId) -> Result<TxOutcome, ExternalServiceError>;

    async fn cancel_auction(&self, auction_id: &AuctionId)
        -> Result<TxOutcome, ExternalServiceError>;
}

pub type SharedProvider = Arc<dyn AuctionProvider>;

/// One-shot handshake that yields a usable provider.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<SharedProvider, ExternalServiceError>;
}
