//! The four surfaces. Each view owns a [`ViewScope`](crate::scope::ViewScope),
//! queries on mount, and renders a plain snapshot the web layer turns into
//! HTML. Display conversion and input staging are the only logic here.
//!
//! Commands take the view by reference and are awaited by the caller, so a
//! view cannot be unmounted while one is in flight. Only the background
//! queries need the scope.

mod buyer;
mod detail;
mod list;
mod seller;

pub use buyer::{BuyerOffersView, BuyerPage, UserOfferRow};
pub use detail::{AuctionDetailView, DetailPage, OfferRow};
pub use list::{AuctionCard, AuctionListView, ListPage};
pub use seller::{SellerAuctionRow, SellerAuctionsView, SellerPage};

use crate::provider::TxOutcome;
use std::sync::{Mutex, MutexGuard};

/// What a view has to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<T> {
    /// Session not ready, or the first query has not settled.
    Loading,
    Ready(T),
}

impl<T> Page<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Page::Ready(page) => Some(page),
            Page::Loading => None,
        }
    }
}

/// How a user-triggered command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    /// Session not ready; nothing was sent.
    Skipped,
    Settled(TxOutcome),
    /// The service rejected it; already reported.
    Failed,
}

impl CommandStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, CommandStatus::Settled(_))
    }
}

/// Routing contract shared by views and the router.
pub mod paths {
    use auction_types::{AuctionId, Uint};

    pub fn auction(id: &AuctionId) -> String {
        format!("/auction/{id}")
    }

    pub fn buyer(address: &str) -> String {
        format!("/buyer/{address}")
    }

    pub fn seller(address: &str, auction_id: &Uint) -> String {
        format!("/seller/{address}/{auction_id}")
    }
}

pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
