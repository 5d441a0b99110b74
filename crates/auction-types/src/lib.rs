//! Read-only projections of the auction contract's state.
//! Zero network dependency: usable by the frontend, its tests and tooling.

mod display;
mod error;
mod model;
mod uint;

pub use display::{format_timestamp, minimum_offer, INVALID_DATE};
pub use error::ParseUintError;
pub use model::{Auction, AuctionId, Offer, OfferId};
pub use uint::Uint;
