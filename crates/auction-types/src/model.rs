use crate::uint::Uint;
use serde::{Deserialize, Serialize};

pub type AuctionId = Uint;
pub type OfferId = Uint;

/// Auction snapshot as reported by the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub seller: String,
    pub name: String,
    pub description: String,
    /// Seconds since the Unix epoch.
    #[serde(alias = "auctionEnd")]
    pub auction_end: Uint,
    #[serde(alias = "minimumOfferPrice")]
    pub minimum_offer_price: Uint,
    /// `0` when nobody has bid yet.
    #[serde(alias = "bestOfferId")]
    pub best_offer_id: OfferId,
    #[serde(alias = "isActive")]
    pub is_active: bool,
}

/// Offer snapshot. `Offer::default()` is what the contract hands back for
/// an id it has no record of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    #[serde(alias = "auctionId")]
    pub auction_id: AuctionId,
    pub buyer: String,
    #[serde(alias = "offerPrice")]
    pub offer_price: Uint,
}

impl Offer {
    pub fn is_placeholder(&self) -> bool {
        self.id.is_zero() && self.buyer.is_empty()
    }
}
