use crate::utils::{
    auction_card, board, market, market_with_auction, CountingProvider, ScriptedProvider, BIDDER,
    SELLER,
};
use anyhow::Result;
use auction_frontend::provider::{AuctionProvider, MemoryConnector, SharedProvider};
use auction_frontend::session::{ProviderContext, Session};
use auction_frontend::views::{
    AuctionDetailView, AuctionListView, BuyerOffersView, CommandStatus, Page, SellerAuctionsView,
};
use auction_types::{Auction, Uint};
use std::sync::atomic::Ordering;
use std::sync::Arc;

async fn auction(session: &Session, id: &Uint) -> Result<Auction> {
    let queries = session.queries().ok_or_else(|| anyhow::anyhow!("session not ready"))?;
    queries
        .list_auctions()
        .await?
        .into_iter()
        .find(|a| &a.id == id)
        .ok_or_else(|| anyhow::anyhow!("auction {id} missing"))
}

#[tokio::test]
async fn test_two_auctions_render_in_order() -> Result<()> {
    let provider =
        ScriptedProvider::new(vec![auction_card(2, "Second"), auction_card(1, "First")]);

    let view = AuctionListView::mount(Session::ready(Arc::new(provider)), board());
    view.settle().await;
    let page = view.render().ready().ok_or_else(|| anyhow::anyhow!("still loading"))?;

    let ids: Vec<&str> = page.auctions.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(page.auctions[0].name, "Second");
    assert_eq!(page.auctions[1].detail_path, "/auction/1");
    Ok(())
}

#[tokio::test]
async fn test_no_bids_suggests_minimum_of_one() -> Result<()> {
    let (market, id) = market_with_auction();
    let session = Session::ready(Arc::new(market.as_account(BIDDER)));
    let auction = auction(&session, &id).await?;
    assert!(auction.best_offer_id.is_zero());

    let view = AuctionDetailView::mount(session, board(), auction);
    view.settle().await;
    assert!(view.best_offer().is_placeholder());

    let page = view.render().ready().ok_or_else(|| anyhow::anyhow!("still loading"))?;
    assert_eq!(page.minimum_offer_hint, "Minimum offer is 1");
    assert_eq!(page.offers, Some(vec![]));
    Ok(())
}

#[tokio::test]
async fn test_offer_success_clears_and_rejection_keeps_staged_amount() -> Result<()> {
    let (market, id) = market_with_auction();
    let session = Session::ready(Arc::new(market.as_account(BIDDER)));
    let reporter = board();

    let mut view = AuctionDetailView::mount(session.clone(), reporter.clone(), auction(&session, &id).await?);
    view.settle().await;

    view.stage_amount(Uint::from(50u64));
    assert!(view.submit_offer().await.is_settled());
    assert_eq!(view.staged_amount(), Uint::ZERO);
    view.settle().await;
    assert_eq!(view.best_offer().offer_price, Uint::from(50u64));
    assert!(reporter.is_empty());

    view.stage_amount(Uint::from(10u64));
    assert_eq!(view.submit_offer().await, CommandStatus::Failed);
    assert_eq!(view.staged_amount(), Uint::from(10u64));
    assert_eq!(
        reporter.drain(),
        vec!["create_offer failed: offer 10 must exceed the best offer 50"]
    );

    let page = view.render().ready().ok_or_else(|| anyhow::anyhow!("still loading"))?;
    assert_eq!(page.minimum_offer_hint, "Minimum offer is 51");
    assert_eq!(page.staged_amount, "10");
    Ok(())
}

#[tokio::test]
async fn test_trade_requeries_detail() -> Result<()> {
    let (market, id) = market_with_auction();
    market
        .as_account(BIDDER)
        .create_offer(&id, &Uint::from(5u64))
        .await?;
    let session = Session::ready(Arc::new(market));

    let mut view = AuctionDetailView::mount(session.clone(), board(), auction(&session, &id).await?);
    view.settle().await;
    assert!(view.trade().await.is_settled());
    view.settle().await;
    assert!(!view.auction().is_active);
    Ok(())
}

#[tokio::test]
async fn test_nothing_reaches_provider_until_ready() -> Result<()> {
    let (market, id) = market_with_auction();
    let snapshot = auction(&Session::ready(Arc::new(market.as_account(BIDDER))), &id).await?;
    let counting = Arc::new(CountingProvider::new(market.as_account(BIDDER)));
    let calls = Arc::clone(&counting.calls);

    struct Handoff(SharedProvider);

    #[async_trait::async_trait]
    impl auction_frontend::provider::Connector for Handoff {
        async fn connect(&self) -> Result<SharedProvider, auction_frontend::ExternalServiceError> {
            Ok(Arc::clone(&self.0))
        }
    }

    let context = ProviderContext::new(Handoff(counting));
    let reporter = board();

    let session = context.current();
    assert!(!session.is_ready());
    let list = AuctionListView::mount(session.clone(), reporter.clone());
    let mut detail = AuctionDetailView::mount(session.clone(), reporter.clone(), snapshot.clone());
    let buyer = BuyerOffersView::mount(session.clone(), reporter.clone(), BIDDER);
    let seller = SellerAuctionsView::mount(session.clone(), reporter.clone(), SELLER, id);
    detail.stage_amount(Uint::from(7u64));
    assert_eq!(detail.submit_offer().await, CommandStatus::Skipped);
    assert_eq!(detail.trade().await, CommandStatus::Skipped);
    assert_eq!(seller.cancel(&id).await, CommandStatus::Skipped);
    list.settle().await;
    detail.settle().await;
    assert_eq!(list.render(), Page::Loading);
    assert_eq!(detail.render(), Page::Loading);
    assert_eq!(buyer.render(), Page::Loading);
    assert_eq!(seller.render(), Page::Loading);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(reporter.is_empty());

    let session = context.connect().await;
    assert!(session.is_ready());
    let list = AuctionListView::mount(session, reporter.clone());
    list.settle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(list.auctions().map(|a| a.len()), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_reads_are_idempotent() -> Result<()> {
    let (market, id) = market_with_auction();
    market
        .as_account(BIDDER)
        .create_offer(&id, &Uint::from(3u64))
        .await?;
    let session = Session::ready(Arc::new(market));
    let queries = session.queries().ok_or_else(|| anyhow::anyhow!("session not ready"))?;

    assert_eq!(queries.list_auctions().await?, queries.list_auctions().await?);
    assert_eq!(queries.get_offers(&id).await?, queries.get_offers(&id).await?);
    assert_eq!(
        queries.get_user_offers(BIDDER).await?,
        queries.get_user_offers(BIDDER).await?
    );
    Ok(())
}

#[tokio::test]
async fn test_buyer_and_seller_pages() -> Result<()> {
    let (market, id) = market_with_auction();
    market
        .as_account(BIDDER)
        .create_offer(&id, &Uint::from(2u64))
        .await?;
    let session = Session::ready(Arc::new(market));
    let reporter = board();

    let buyer = BuyerOffersView::mount(session.clone(), reporter.clone(), BIDDER);
    buyer.settle().await;
    let page = buyer.render().ready().ok_or_else(|| anyhow::anyhow!("still loading"))?;
    assert_eq!(page.offers.len(), 1);
    assert_eq!(page.offers[0].auction_id, "1");
    assert_eq!(page.offers[0].offer_price, "2");

    let seller = SellerAuctionsView::mount(session, reporter.clone(), SELLER, id);
    seller.settle().await;
    let page = seller.render().ready().ok_or_else(|| anyhow::anyhow!("still loading"))?;
    assert_eq!(page.auctions.len(), 1);
    assert_eq!(page.auctions[0].status, "Active");
    assert!(reporter.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_handshake_stays_not_ready() {
    struct Refuse;

    #[async_trait::async_trait]
    impl auction_frontend::provider::Connector for Refuse {
        async fn connect(&self) -> Result<SharedProvider, auction_frontend::ExternalServiceError> {
            Err(auction_frontend::ExternalServiceError::new("provider", "no network"))
        }
    }

    let context = ProviderContext::new(Refuse);
    assert!(!context.connect().await.is_ready());
    assert!(!context.connect().await.is_ready());
    assert!(!context.is_ready());

    let ready = ProviderContext::new(MemoryConnector::new(market()));
    assert!(ready.connect().await.is_ready());
}
