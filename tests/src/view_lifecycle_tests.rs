use crate::utils::{board, market_with_auction, GatedProvider};
use anyhow::Result;
use auction_frontend::session::Session;
use auction_frontend::views::AuctionListView;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_unmount_while_query_pending_never_applies() -> Result<()> {
    let (market, _) = market_with_auction();
    let gated = Arc::new(GatedProvider::new(market));
    let entered = Arc::clone(&gated.entered);
    let release = Arc::clone(&gated.release);
    let reporter = board();

    let view = AuctionListView::mount(Session::ready(gated), reporter.clone());
    tokio::time::timeout(Duration::from_secs(5), entered.notified()).await?;

    view.unmount();
    release.notify_one();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The late failure would have been reported had it been applied.
    assert!(reporter.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_pending_query_lands_while_mounted() -> Result<()> {
    let (market, _) = market_with_auction();
    let gated = Arc::new(GatedProvider::new(market));
    let entered = Arc::clone(&gated.entered);
    let release = Arc::clone(&gated.release);
    let reporter = board();

    let view = AuctionListView::mount(Session::ready(gated), reporter.clone());
    tokio::time::timeout(Duration::from_secs(5), entered.notified()).await?;
    release.notify_one();
    view.settle().await;

    assert_eq!(reporter.drain(), vec!["get_auctions failed: arrived late"]);
    assert_eq!(view.auctions(), Some(vec![]));
    Ok(())
}

#[tokio::test]
async fn test_session_switch_revokes_pending_query() -> Result<()> {
    let (stale, _) = market_with_auction();
    let gated = Arc::new(GatedProvider::new(stale));
    let entered = Arc::clone(&gated.entered);
    let release = Arc::clone(&gated.release);
    let reporter = board();

    let mut view = AuctionListView::mount(Session::ready(gated), reporter.clone());
    tokio::time::timeout(Duration::from_secs(5), entered.notified()).await?;

    let (fresh, _) = market_with_auction();
    view.on_session_changed(Session::ready(Arc::new(fresh)));
    view.settle().await;
    release.notify_one();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(reporter.is_empty());
    assert_eq!(view.auctions().map(|a| a.len()), Some(1));
    Ok(())
}
