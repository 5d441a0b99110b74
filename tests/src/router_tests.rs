use crate::utils::{
    app, app_with, auction_card, body_string, market_with_auction, ScriptedProvider, BIDDER,
};
use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use tower::ServiceExt;

fn get(uri: &str) -> Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

fn post_form(uri: &str, form: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))?)
}

#[tokio::test]
async fn test_pages_show_loading_until_connected() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, state) = app(market);

    let response = router.clone().oneshot(get("/ready")?).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    for uri in ["/", "/auction/1", "/buyer/bob.testnet", "/seller/alice.testnet/1"] {
        let response = router.clone().oneshot(get(uri)?).await?;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_string(response).await?.contains("Loading..."), "{uri}");
    }

    state.context.connect().await;
    let response = router.clone().oneshot(get("/ready")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(router.oneshot(get("/")?).await?).await?;
    assert!(body.contains("Brass lamp"));
    assert!(body.contains("href=\"/auction/1\""));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_pages_keep_their_own_notices() -> Result<()> {
    let barrier = Arc::new(Barrier::new(2));
    let provider = ScriptedProvider::new(vec![auction_card(1, "Brass lamp")])
        .failing("get_user_offers", "bob failure")
        .in_step(Arc::clone(&barrier));
    let (router, state) = app_with(Arc::new(provider));
    state.context.connect().await;

    let (list, buyer) = (get("/")?, get("/buyer/bob.testnet")?);
    let (list, buyer) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(router.clone().oneshot(list), router.clone().oneshot(buyer))
    })
    .await?;
    let list = body_string(list?).await?;
    let buyer = body_string(buyer?).await?;

    assert!(list.contains("Brass lamp"));
    assert!(!list.contains("bob failure"));
    assert!(buyer.contains("get_user_offers failed: bob failure"));
    Ok(())
}

#[tokio::test]
async fn test_health_reports_provider_and_readiness() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, state) = app(market);
    state.context.connect().await;

    let response = router.oneshot(get("/health")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await?)?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ready"], true);
    assert_eq!(body["contract_id"], "auction.testnet");
    Ok(())
}

#[tokio::test]
async fn test_request_id_is_echoed() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, _) = app(market);

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-123")
        .body(Body::empty())?;
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.headers()["x-request-id"], "trace-123");

    let response = router.oneshot(get("/health")?).await?;
    let generated = response.headers()["x-request-id"].to_str()?;
    assert!(generated.starts_with("auc-"));
    Ok(())
}

#[tokio::test]
async fn test_offer_form_flow() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, state) = app(market.as_account(BIDDER));
    state.context.connect().await;

    let body = body_string(router.clone().oneshot(get("/auction/1")?).await?).await?;
    assert!(body.contains("Minimum offer is 1"));
    assert!(body.contains("No offers yet."));

    let response = router
        .clone()
        .oneshot(post_form("/auction/1/offer", "amount=50")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await?;
    assert!(body.contains("Transaction mem-"));
    assert!(body.contains("name=\"amount\" value=\"0\""));
    assert!(body.contains("Minimum offer is 51"));
    assert!(body.contains("href=\"/buyer/bob.testnet\""));

    let body = body_string(
        router
            .clone()
            .oneshot(post_form("/auction/1/offer", "amount=10")?)
            .await?,
    )
    .await?;
    assert!(body.contains("create_offer failed: offer 10 must exceed the best offer 50"));
    assert!(body.contains("name=\"amount\" value=\"10\""));

    let body = body_string(router.clone().oneshot(get("/auction/1")?).await?).await?;
    assert!(!body.contains("must exceed"));

    let body = body_string(
        router
            .oneshot(post_form("/auction/1/offer", "amount=lots")?)
            .await?,
    )
    .await?;
    assert!(body.contains("invalid"));
    assert!(body.contains("name=\"amount\" value=\"0\""));
    Ok(())
}

#[tokio::test]
async fn test_unknown_and_malformed_auction_ids() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, state) = app(market);
    state.context.connect().await;

    let response = router.clone().oneshot(get("/auction/99")?).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router.oneshot(get("/auction/abc")?).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_cancel_by_non_seller_is_reported() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, state) = app(market.as_account(BIDDER));
    state.context.connect().await;

    let body = body_string(
        router
            .clone()
            .oneshot(post_form("/seller/alice.testnet/1/cancel", "")?)
            .await?,
    )
    .await?;
    assert!(body.contains("cancel_auction failed: only the seller can cancel"));
    assert!(body.contains("Active"));

    let (router, state) = app(market);
    state.context.connect().await;
    let body = body_string(
        router
            .oneshot(post_form("/seller/alice.testnet/1/cancel", "")?)
            .await?,
    )
    .await?;
    assert!(body.contains("Cancelled"));
    assert!(body.contains("Transaction mem-"));
    Ok(())
}

#[tokio::test]
async fn test_metrics_exposition() -> Result<()> {
    let (market, _) = market_with_auction();
    let (router, _) = app(market);

    let response = router.oneshot(get("/metrics")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await?;
    assert!(body.contains("# TYPE auction_queries_total counter"));
    Ok(())
}
