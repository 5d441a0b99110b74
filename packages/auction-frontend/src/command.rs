//! Write operations. Each call settles once; no retry, no cancellation.

use crate::error::ExternalServiceError;
use crate::metrics::METRICS;
use crate::provider::{SharedProvider, TxOutcome};
use auction_types::{AuctionId, Uint};
use std::sync::atomic::Ordering;
use tracing::info;

#[derive(Clone, Copy)]
pub struct AuctionCommands<'a> {
    provider: &'a SharedProvider,
}

impl<'a> AuctionCommands<'a> {
    pub(crate) fn new(provider: &'a SharedProvider) -> Self {
        Self { provider }
    }

    /// Bid `amount` (attached as value). The service decides whether the
    /// amount is high enough; nothing is checked here.
    pub async fn create_offer(
        &self,
        auction_id: &AuctionId,
        amount: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError> {
        let result = self.provider.create_offer(auction_id, amount).await;
        settled("create_offer", auction_id, result)
    }

    /// Settle the auction at its current best offer.
    pub async fn trade(&self, auction_id: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        let result = self.provider.trade(auction_id).await;
        settled("trade", auction_id, result)
    }

    pub async fn cancel_auction(
        &self,
        auction_id: &AuctionId,
    ) -> Result<TxOutcome, ExternalServiceError> {
        let result = self.provider.cancel_auction(auction_id).await;
        settled("cancel_auction", auction_id, result)
    }
}

fn settled(
    method: &'static str,
    auction_id: &AuctionId,
    result: Result<TxOutcome, ExternalServiceError>,
) -> Result<TxOutcome, ExternalServiceError> {
    METRICS.commands_total.fetch_add(1, Ordering::Relaxed);
    match &result {
        Ok(outcome) => {
            info!(method, auction = %auction_id, tx_hash = ?outcome.tx_hash, "Transaction settled");
        }
        Err(_) => {
            METRICS.command_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
    result
}
