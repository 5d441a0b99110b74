use super::{lock, paths, Page};
use crate::reporter::SharedReporter;
use crate::scope::ViewScope;
use crate::session::Session;
use auction_types::Offer;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOfferRow {
    pub offer_id: String,
    pub auction_id: String,
    pub auction_path: String,
    pub buyer: String,
    pub offer_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerPage {
    pub buyer: String,
    pub offers: Vec<UserOfferRow>,
}

/// Offers placed by one address.
pub struct BuyerOffersView {
    buyer: String,
    offers: Arc<Mutex<Option<Vec<Offer>>>>,
    scope: ViewScope,
}

impl BuyerOffersView {
    pub fn mount(session: Session, reporter: SharedReporter, buyer: impl Into<String>) -> Self {
        let view = Self {
            buyer: buyer.into(),
            offers: Arc::new(Mutex::new(None)),
            scope: ViewScope::new(),
        };
        if session.is_ready() {
            let buyer = view.buyer.clone();
            let sink = Arc::clone(&view.offers);
            view.scope.spawn(
                async move {
                    match session.queries() {
                        Some(queries) => Some(queries.get_user_offers(&buyer).await),
                        None => None,
                    }
                },
                move |result| match result {
                    Some(Ok(offers)) => *lock(&sink) = Some(offers),
                    Some(Err(e)) => {
                        reporter.report(&e);
                        lock(&sink).get_or_insert_with(Vec::new);
                    }
                    None => {}
                },
            );
        }
        view
    }

    pub async fn settle(&self) {
        self.scope.settle().await;
    }

    pub fn render(&self) -> Page<BuyerPage> {
        let offers = lock(&self.offers);
        let Some(offers) = offers.as_ref() else {
            return Page::Loading;
        };
        Page::Ready(BuyerPage {
            buyer: self.buyer.clone(),
            offers: offers
                .iter()
                .map(|o| UserOfferRow {
                    offer_id: o.id.to_string(),
                    auction_id: o.auction_id.to_string(),
                    auction_path: paths::auction(&o.auction_id),
                    buyer: o.buyer.clone(),
                    offer_price: o.offer_price.to_string(),
                })
                .collect(),
        })
    }

    pub fn unmount(self) {
        self.scope.teardown();
    }
}
