//! In-process auction service for demo mode and tests. Checks who may act,
//! whether the auction is still open, and that offers clear the minimum and
//! beat the best offer. `auction_end` is display data only and is never
//! checked: bids and trades after the deadline are accepted.

use super::{AuctionProvider, Connector, SharedProvider, TxOutcome};
use crate::error::ExternalServiceError;
use async_trait::async_trait;
use auction_types::{Auction, AuctionId, Offer, OfferId, Uint};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Default)]
struct Book {
    auctions: Vec<Auction>,
    /// Offer `n` lives at index `n - 1`; id 0 is never assigned.
    offers: Vec<Offer>,
}

/// Auction service held in memory. Clones made with [`as_account`] share
/// the same book, so several callers can bid against one another.
///
/// [`as_account`]: MemoryProvider::as_account
pub struct MemoryProvider {
    account: String,
    book: Arc<Mutex<Book>>,
    tx_counter: Arc<AtomicU64>,
}

impl MemoryProvider {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            book: Arc::new(Mutex::new(Book::default())),
            tx_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Seeded with a few open auctions ending a week from `now_secs`.
    pub fn demo(account: impl Into<String>, now_secs: u64) -> Self {
        let provider = Self::new(account);
        let end = Uint::from(now_secs + 7 * 24 * 3600);
        provider.seed_auction(
            "alice.testnet",
            "Vintage camera",
            "Rangefinder, 1962",
            end,
            Uint::from(100u64),
        );
        provider.seed_auction(
            "bob.testnet",
            "Oak desk",
            "Solid oak, two drawers",
            end,
            Uint::from(250u64),
        );
        provider.seed_auction(
            "carol.testnet",
            "Genesis NFT",
            "Priced in yoctoNEAR",
            end,
            "1000000000000000000000000".parse().unwrap_or_default(),
        );
        provider
    }

    /// Same book, different caller.
    pub fn as_account(&self, account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            book: Arc::clone(&self.book),
            tx_counter: Arc::clone(&self.tx_counter),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Post an auction directly, bypassing any caller checks.
    pub fn seed_auction(
        &self,
        seller: &str,
        name: &str,
        description: &str,
        auction_end: Uint,
        minimum_offer_price: Uint,
    ) -> AuctionId {
        let mut book = self.book();
        let id = Uint::from(book.auctions.len() as u64 + 1);
        book.auctions.push(Auction {
            id,
            seller: seller.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            auction_end,
            minimum_offer_price,
            best_offer_id: Uint::ZERO,
            is_active: true,
        });
        id
    }

    fn book(&self) -> std::sync::MutexGuard<'_, Book> {
        self.book.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_outcome(&self) -> TxOutcome {
        let n = self.tx_counter.fetch_add(1, Ordering::Relaxed) + 1;
        TxOutcome {
            tx_hash: Some(format!("mem-{n:08x}")),
        }
    }
}

fn auction_mut<'a>(
    book: &'a mut Book,
    auction_id: &AuctionId,
    method: &'static str,
) -> Result<&'a mut Auction, ExternalServiceError> {
    book.auctions
        .iter_mut()
        .find(|a| &a.id == auction_id)
        .ok_or_else(|| ExternalServiceError::new(method, format!("auction {auction_id} not found")))
}

fn offer_by_id(book: &Book, offer_id: &OfferId) -> Offer {
    offer_id
        .to_u64()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| book.offers.get(idx))
        .cloned()
        .unwrap_or_default()
}

#[async_trait]
impl AuctionProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, ExternalServiceError> {
        Ok(self.book().auctions.clone())
    }

    async fn get_auction_offers(
        &self,
        auction_id: &AuctionId,
    ) -> Result<Vec<Offer>, ExternalServiceError> {
        let book = self.book();
        Ok(book
            .offers
            .iter()
            .filter(|o| &o.auction_id == auction_id)
            .cloned()
            .collect())
    }

    async fn get_offer(&self, offer_id: &OfferId) -> Result<Offer, ExternalServiceError> {
        Ok(offer_by_id(&self.book(), offer_id))
    }

    async fn get_user_offers(&self, buyer: &str) -> Result<Vec<Offer>, ExternalServiceError> {
        let book = self.book();
        Ok(book.offers.iter().filter(|o| o.buyer == buyer).cloned().collect())
    }

    async fn get_user_auctions(&self, seller: &str) -> Result<Vec<Auction>, ExternalServiceError> {
        let book = self.book();
        Ok(book
            .auctions
            .iter()
            .filter(|a| a.seller == seller)
            .cloned()
            .collect())
    }

    async fn create_offer(
        &self,
        auction_id: &AuctionId,
        amount: &Uint,
    ) -> Result<TxOutcome, ExternalServiceError> {
        const METHOD: &str = "create_offer";
        let mut book = self.book();
        let next_id = Uint::from(book.offers.len() as u64 + 1);

        let (best_offer_id, minimum) = {
            let auction = auction_mut(&mut book, auction_id, METHOD)?;
            if !auction.is_active {
                return Err(ExternalServiceError::new(METHOD, "auction is not active"));
            }
            if auction.seller == self.account {
                return Err(ExternalServiceError::new(METHOD, "seller cannot bid on own auction"));
            }
            (auction.best_offer_id, auction.minimum_offer_price)
        };

        if amount < &minimum {
            return Err(ExternalServiceError::new(
                METHOD,
                format!("offer {amount} is below the minimum price {minimum}"),
            ));
        }
        let best = offer_by_id(&book, &best_offer_id);
        if !best_offer_id.is_zero() && amount <= &best.offer_price {
            return Err(ExternalServiceError::new(
                METHOD,
                format!("offer {amount} must exceed the best offer {}", best.offer_price),
            ));
        }

        book.offers.push(Offer {
            id: next_id,
            auction_id: *auction_id,
            buyer: self.account.clone(),
            offer_price: *amount,
        });
        auction_mut(&mut book, auction_id, METHOD)?.best_offer_id = next_id;
        debug!(auction = %auction_id, offer = %next_id, %amount, "Offer recorded");
        Ok(self.next_outcome())
    }

    async fn trade(&self, auction_id: &AuctionId) -> Result<TxOutcome, ExternalServiceError> {
        const METHOD: &str = "trade";
        let mut book = self.book();
        let auction = auction_mut(&mut book, auction_id, METHOD)?;
        if !auction.is_active {
            return Err(ExternalServiceError::new(METHOD, "auction is not active"));
        }
        if auction.best_offer_id.is_zero() {
            return Err(ExternalServiceError::new(METHOD, "no offers to trade"));
        }
        auction.is_active = false;
        debug!(auction = %auction_id, offer = %auction.best_offer_id, "Auction settled");
        Ok(self.next_outcome())
    }

    async fn cancel_auction(
        &self,
        auction_id: &AuctionId,
    ) -> Result<TxOutcome, ExternalServiceError> {
        const METHOD: &str = "cancel_auction";
        let mut book = self.book();
        let auction = auction_mut(&mut book, auction_id, METHOD)?;
        if auction.seller != self.account {
            return Err(ExternalServiceError::new(METHOD, "only the seller can cancel"));
        }
        if !auction.is_active {
            return Err(ExternalServiceError::new(METHOD, "auction is not active"));
        }
        auction.is_active = false;
        debug!(auction = %auction_id, "Auction cancelled");
        Ok(self.next_outcome())
    }
}

/// Hands out a pre-built [`MemoryProvider`].
pub struct MemoryConnector {
    provider: SharedProvider,
}

impl MemoryConnector {
    pub fn new(provider: MemoryProvider) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<SharedProvider, ExternalServiceError> {
        Ok(Arc::clone(&self.provider))
    }
}
