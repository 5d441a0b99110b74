//! Read-only accessors. Only a ready [`Session`](crate::session::Session)
//! can produce one.

use crate::error::ExternalServiceError;
use crate::metrics::METRICS;
use crate::provider::SharedProvider;
use auction_types::{Auction, AuctionId, Offer, OfferId};
use std::future::Future;
use std::sync::atomic::Ordering;
use tracing::debug;

#[derive(Clone, Copy)]
pub struct AuctionQueries<'a> {
    provider: &'a SharedProvider,
}

impl<'a> AuctionQueries<'a> {
    pub(crate) fn new(provider: &'a SharedProvider) -> Self {
        Self { provider }
    }

    /// All auctions, in the order the service returns them.
    pub async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError> {
        counted(self.provider.list_auctions()).await
    }

    /// Offers on one auction; empty when nobody has bid.
    pub async fn get_offers(
        &self,
        auction_id: &AuctionId,
    ) -> Result<Vec<Offer>, ExternalServiceError> {
        counted(self.provider.get_auction_offers(auction_id)).await
    }

    /// Resolve an auction's best-offer pointer. An id the service has no
    /// record of (e.g. `0` before any bid) yields `Offer::default()`.
    pub async fn get_best_offer(
        &self,
        auction_id: &AuctionId,
        best_offer_id: &OfferId,
    ) -> Result<Offer, ExternalServiceError> {
        let offer = counted(self.provider.get_offer(best_offer_id)).await?;
        if offer.is_placeholder() {
            debug!(auction = %auction_id, offer = %best_offer_id, "No best offer on record");
        }
        Ok(offer)
    }

    pub async fn get_user_offers(&self, buyer: &str) -> Result<Vec<Offer>, ExternalServiceError> {
        counted(self.provider.get_user_offers(buyer)).await
    }

    pub async fn get_user_auctions(
        &self,
        seller: &str,
    ) -> Result<Vec<Auction>, ExternalServiceError> {
        counted(self.provider.get_user_auctions(seller)).await
    }
}

async fn counted<T>(
    call: impl Future<Output = Result<T, ExternalServiceError>>,
) -> Result<T, ExternalServiceError> {
    METRICS.queries_total.fetch_add(1, Ordering::Relaxed);
    let result = call.await;
    if result.is_err() {
        METRICS.query_errors.fetch_add(1, Ordering::Relaxed);
    }
    result
}
