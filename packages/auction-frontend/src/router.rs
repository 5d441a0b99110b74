//! HTTP router setup.

use crate::handlers;
use crate::middleware::inject_request_id;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/auction/{id}", get(handlers::auction_detail))
        .route("/auction/{id}/offer", post(handlers::create_offer))
        .route("/auction/{id}/trade", post(handlers::trade))
        .route("/buyer/{address}", get(handlers::buyer_offers))
        .route("/seller/{address}/{auction_id}", get(handlers::seller_auctions))
        .route(
            "/seller/{address}/{auction_id}/cancel",
            post(handlers::cancel_auction),
        )
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(inject_request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
