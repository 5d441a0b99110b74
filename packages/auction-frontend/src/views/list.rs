use super::{lock, paths, Page};
use crate::reporter::SharedReporter;
use crate::scope::ViewScope;
use crate::session::Session;
use auction_types::{format_timestamp, Auction};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ends_on: String,
    pub seller: String,
    pub detail_path: String,
    pub seller_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage {
    pub auctions: Vec<AuctionCard>,
}

/// Every auction, in service order. Re-queries whenever it is handed a
/// different session.
pub struct AuctionListView {
    session: Session,
    reporter: SharedReporter,
    auctions: Arc<Mutex<Option<Vec<Auction>>>>,
    scope: ViewScope,
}

impl AuctionListView {
    pub fn mount(session: Session, reporter: SharedReporter) -> Self {
        let view = Self {
            session,
            reporter,
            auctions: Arc::new(Mutex::new(None)),
            scope: ViewScope::new(),
        };
        view.refresh();
        view
    }

    /// A query still in flight against the old session is revoked.
    pub fn on_session_changed(&mut self, session: Session) {
        if self.session.same_as(&session) {
            return;
        }
        std::mem::take(&mut self.scope).teardown();
        self.session = session;
        self.refresh();
    }

    fn refresh(&self) {
        if !self.session.is_ready() {
            return;
        }
        let session = self.session.clone();
        let reporter = Arc::clone(&self.reporter);
        let sink = Arc::clone(&self.auctions);

        self.scope.spawn(
            async move {
                match session.queries() {
                    Some(queries) => Some(queries.list_auctions().await),
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

    /// Snapshot currently held (raw projections).
    pub fn auctions(&self) -> Option<Vec<Auction>> {
        lock(&self.auctions).clone()
    }

    pub async fn settle(&self) {
        self.scope.settle().await;
    }

    pub fn render(&self) -> Page<ListPage> {
        let auctions = lock(&self.auctions);
        let Some(auctions) = auctions.as_ref() else {
            return Page::Loading;
        };
        Page::Ready(ListPage {
            auctions: auctions
                .iter()
                .map(|a| AuctionCard {
                    id: a.id.to_string(),
                    name: a.name.clone(),
                    description: a.description.clone(),
                    ends_on: format_timestamp(&a.auction_end),
                    seller: a.seller.clone(),
                    detail_path: paths::auction(&a.id),
                    seller_path: paths::seller(&a.seller, &a.id),
                })
                .collect(),
        })
    }

    pub fn unmount(self) {
        self.scope.teardown();
    }
}
