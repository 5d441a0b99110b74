use super::{lock, paths, CommandStatus, Page};
use crate::error::ExternalServiceError;
use crate::reporter::SharedReporter;
use crate::scope::ViewScope;
use crate::session::Session;
use auction_types::{format_timestamp, minimum_offer, Auction, Offer, ParseUintError, Uint};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRow {
    pub buyer: String,
    pub buyer_path: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ends_on: String,
    pub seller: String,
    pub seller_path: String,
    /// Current content of the offer input.
    pub staged_amount: String,
    pub minimum_offer_hint: String,
    pub input_error: Option<String>,
    /// `None` until the offers query has settled.
    pub offers: Option<Vec<OfferRow>>,
}

struct DetailState {
    auction: Auction,
    offers: Option<Vec<Offer>>,
    best_offer: Offer,
}

/// One auction: its offers, the suggested minimum, and the offer form.
pub struct AuctionDetailView {
    session: Session,
    reporter: SharedReporter,
    state: Arc<Mutex<DetailState>>,
    staged_amount: Uint,
    input_error: Option<String>,
    scope: ViewScope,
}

impl AuctionDetailView {
    /// Mount with the snapshot the list view navigated from.
    pub fn mount(session: Session, reporter: SharedReporter, auction: Auction) -> Self {
        let view = Self {
            session,
            reporter,
            state: Arc::new(Mutex::new(DetailState {
                auction,
                offers: None,
                best_offer: Offer::default(),
            })),
            staged_amount: Uint::ZERO,
            input_error: None,
            scope: ViewScope::new(),
        };
        view.load(false);
        view
    }

    /// Fetch offers and the best offer together. After a command the
    /// auction snapshot is refreshed first so a moved best-offer pointer
    /// is followed.
    fn load(&self, refresh_auction: bool) {
        if !self.session.is_ready() {
            return;
        }
        let session = self.session.clone();
        let reporter = Arc::clone(&self.reporter);
        let sink = Arc::clone(&self.state);
        let snapshot = lock(&self.state).auction.clone();

        self.scope.spawn(
            async move {
                match session.queries() {
                    Some(queries) => Some(fetch(queries, snapshot, refresh_auction).await),
                    None => None,
                }
            },
            move |result| match result {
                Some(Ok((auction, offers, best_offer))) => {
                    let mut state = lock(&sink);
                    state.auction = auction;
                    state.offers = Some(offers);
                    state.best_offer = best_offer;
                }
                Some(Err(e)) => {
                    reporter.report(&e);
                    lock(&sink).offers.get_or_insert_with(Vec::new);
                }
                None => {}
            },
        );
    }

    pub fn staged_amount(&self) -> Uint {
        self.staged_amount
    }

    pub fn stage_amount(&mut self, amount: Uint) {
        self.staged_amount = amount;
        self.input_error = None;
    }

    /// Stage typed text. Unparseable text leaves the staged amount alone.
    pub fn stage_input(&mut self, input: &str) -> Result<(), ParseUintError> {
        match input.parse::<Uint>() {
            Ok(amount) => {
                self.stage_amount(amount);
                Ok(())
            }
            Err(e) => {
                self.input_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit the staged amount as an offer. Cleared only on success.
    pub async fn submit_offer(&mut self) -> CommandStatus {
        let Some(commands) = self.session.commands() else {
            return CommandStatus::Skipped;
        };
        let auction_id = lock(&self.state).auction.id;
        let amount = self.staged_amount;

        let status = settle_command(
            &self.reporter,
            commands.create_offer(&auction_id, &amount).await,
        );
        if status.is_settled() {
            self.staged_amount = Uint::ZERO;
            self.load(true);
        }
        status
    }

    /// Accept the current best offer.
    pub async fn trade(&mut self) -> CommandStatus {
        let Some(commands) = self.session.commands() else {
            return CommandStatus::Skipped;
        };
        let auction_id = lock(&self.state).auction.id;

        let status = settle_command(&self.reporter, commands.trade(&auction_id).await);
        if status.is_settled() {
            self.staged_amount = Uint::ZERO;
            self.load(true);
        }
        status
    }

    pub fn auction(&self) -> Auction {
        lock(&self.state).auction.clone()
    }

    pub fn best_offer(&self) -> Offer {
        lock(&self.state).best_offer.clone()
    }

    pub async fn settle(&self) {
        self.scope.settle().await;
    }

    pub fn render(&self) -> Page<DetailPage> {
        if !self.session.is_ready() {
            return Page::Loading;
        }
        let state = lock(&self.state);
        let auction = &state.auction;
        Page::Ready(DetailPage {
            id: auction.id.to_string(),
            name: auction.name.clone(),
            description: auction.description.clone(),
            ends_on: format_timestamp(&auction.auction_end),
            seller: auction.seller.clone(),
            seller_path: paths::seller(&auction.seller, &auction.id),
            staged_amount: self.staged_amount.to_string(),
            minimum_offer_hint: match minimum_offer(&state.best_offer) {
                Some(minimum) => format!("Minimum offer is {minimum}"),
                None => "No higher offer possible".to_string(),
            },
            input_error: self.input_error.clone(),
            offers: state.offers.as_ref().map(|offers| {
                offers
                    .iter()
                    .map(|o| OfferRow {
                        buyer: o.buyer.clone(),
                        buyer_path: paths::buyer(&o.buyer),
                        amount: o.offer_price.to_string(),
                    })
                    .collect()
            }),
        })
    }

    pub fn unmount(self) {
        self.scope.teardown();
    }
}

async fn fetch(
    queries: crate::query::AuctionQueries<'_>,
    snapshot: Auction,
    refresh_auction: bool,
) -> Result<(Auction, Vec<Offer>, Offer), ExternalServiceError> {
    let auction = if refresh_auction {
        queries
            .list_auctions()
            .await?
            .into_iter()
            .find(|a| a.id == snapshot.id)
            .unwrap_or(snapshot)
    } else {
        snapshot
    };
    let offers = queries.get_offers(&auction.id).await?;
    let best_offer = queries
        .get_best_offer(&auction.id, &auction.best_offer_id)
        .await?;
    Ok((auction, offers, best_offer))
}

pub(super) fn settle_command(
    reporter: &SharedReporter,
    outcome: Result<crate::provider::TxOutcome, ExternalServiceError>,
) -> CommandStatus {
    match outcome {
        Ok(outcome) => CommandStatus::Settled(outcome),
        Err(e) => {
            reporter.report(&e);
            CommandStatus::Failed
        }
    }
}
