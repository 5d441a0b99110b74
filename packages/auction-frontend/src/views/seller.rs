use super::detail::settle_command;
use super::{lock, CommandStatus, Page};
use crate::reporter::SharedReporter;
use crate::scope::ViewScope;
use crate::session::Session;
use auction_types::{format_timestamp, Auction, AuctionId};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerAuctionRow {
    pub id: String,
    pub seller: String,
    pub name: String,
    pub description: String,
    pub ends_on: String,
    /// "Active" or "Cancelled".
    pub status: &'static str,
    /// Row for the auction the page was opened from.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerPage {
    pub seller: String,
    pub auctions: Vec<SellerAuctionRow>,
}

/// Auctions posted by one seller, with a cancel action.
pub struct SellerAuctionsView {
    session: Session,
    reporter: SharedReporter,
    seller: String,
    selected: AuctionId,
    auctions: Arc<Mutex<Option<Vec<Auction>>>>,
    scope: ViewScope,
}

impl SellerAuctionsView {
    pub fn mount(
        session: Session,
        reporter: SharedReporter,
        seller: impl Into<String>,
        selected: AuctionId,
    ) -> Self {
        let view = Self {
            session,
            reporter,
            seller: seller.into(),
            selected,
            auctions: Arc::new(Mutex::new(None)),
            scope: ViewScope::new(),
        };
        view.refresh();
        view
    }

    fn refresh(&self) {
        if !self.session.is_ready() {
            return;
        }
        let session = self.session.clone();
        let reporter = Arc::clone(&self.reporter);
        let seller = self.seller.clone();
        let sink = Arc::clone(&self.auctions);

        self.scope.spawn(
            async move {
                match session.queries() {
                    Some(queries) => Some(queries.get_user_auctions(&seller).await),
                    None => None,
                }
            },
            move |result| match result {
                Some(Ok(auctions)) => *lock(&sink) = Some(auctions),
                Some(Err(e)) => {
                    reporter.report(&e);
                    lock(&sink).get_or_insert_with(Vec::new);
                }
                None => {}
            },
        );
    }

    /// Cancel one of the listed auctions, then re-query the list.
    pub async fn cancel(&self, auction_id: &AuctionId) -> CommandStatus {
        let Some(commands) = self.session.commands() else {
            return CommandStatus::Skipped;
        };
        let status = settle_command(&self.reporter, commands.cancel_auction(auction_id).await);
        if status.is_settled() {
            self.refresh();
        }
        status
    }

    /// Cancel the auction the page was opened for.
    pub async fn cancel_selected(&self) -> CommandStatus {
        let selected = self.selected;
        self.cancel(&selected).await
    }

    pub async fn settle(&self) {
        self.scope.settle().await;
    }

    pub fn render(&self) -> Page<SellerPage> {
        let auctions = lock(&self.auctions);
        let Some(auctions) = auctions.as_ref() else {
            return Page::Loading;
        };
        Page::Ready(SellerPage {
            seller: self.seller.clone(),
            auctions: auctions
                .iter()
                .map(|a| SellerAuctionRow {
                    id: a.id.to_string(),
                    seller: a.seller.clone(),
                    name: a.name.clone(),
                    description: a.description.clone(),
                    ends_on: format_timestamp(&a.auction_end),
                    status: if a.is_active { "Active" } else { "Cancelled" },
                    selected: a.id == self.selected,
                })
                .collect(),
        })
    }

    pub fn unmount(self) {
        self.scope.teardown();
    }
}
