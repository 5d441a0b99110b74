//! HTTP request handlers. Each page request mounts a fresh view against the
//! current session, lets its queries settle, renders, then unmounts.
//! Failures are collected on a board owned by the request, so a page only
//! ever shows its own notices.

use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::render;
use crate::reporter::{ErrorReporter, NoticeBoard};
use crate::response::HealthResponse;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{
    AuctionDetailView, AuctionListView, BuyerOffersView, CommandStatus, Page, SellerAuctionsView,
};
use auction_types::{Auction, AuctionId, Uint};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Form, Json};
use serde::Deserialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Deserialize)]
pub struct OfferForm {
    #[serde(default)]
    pub amount: String,
}

/// Readiness check. 200 once the auction service handshake has succeeded.
pub async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.context.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Prometheus metrics in text exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = METRICS.render(state.context.is_ready());
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        body,
    )
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ready = state.context.is_ready();
    Json(HealthResponse {
        status: if ready { "ok" } else { "connecting" },
        contract_id: state.config.contract_id.clone(),
        provider: state.config.provider.as_str(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
        ready,
    })
}

/// `GET /`
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let view = AuctionListView::mount(state.context.current(), notices.clone());
    view.settle().await;
    let page = view.render();
    view.unmount();

    page_response(&notices, "Auctions", page, None, render::list)
}

/// `GET /auction/{id}`
pub async fn auction_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let view = match mount_detail(&state, &notices, &id).await {
        Ok(view) => view,
        Err(response) => return response,
    };
    let page = view.render();
    view.unmount();

    page_response(&notices, "Auction", page, None, render::detail)
}

/// `POST /auction/{id}/offer`
pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(id): Path<String>,
    Form(form): Form<OfferForm>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let mut view = match mount_detail(&state, &notices, &id).await {
        Ok(view) => view,
        Err(response) => return response,
    };

    let status = match view.stage_input(form.amount.trim()) {
        Ok(()) => {
            info!(
                request_id = %request_id,
                auction_id = %id,
                amount = %view.staged_amount(),
                "Submitting offer"
            );
            view.submit_offer().await
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Rejected offer input");
            CommandStatus::Skipped
        }
    };
    view.settle().await;
    let page = view.render();
    view.unmount();

    page_response(&notices, "Auction", page, flash(&status), render::detail)
}

/// `POST /auction/{id}/trade`
pub async fn trade(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(id): Path<String>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let mut view = match mount_detail(&state, &notices, &id).await {
        Ok(view) => view,
        Err(response) => return response,
    };

    info!(request_id = %request_id, auction_id = %id, "Accepting best offer");
    let status = view.trade().await;
    view.settle().await;
    let page = view.render();
    view.unmount();

    page_response(&notices, "Auction", page, flash(&status), render::detail)
}

/// `GET /buyer/{address}`
pub async fn buyer_offers(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let view = BuyerOffersView::mount(state.context.current(), notices.clone(), address);
    view.settle().await;
    let page = view.render();
    view.unmount();

    page_response(&notices, "Offers", page, None, render::buyer)
}

/// `GET /seller/{address}/{auction_id}`
pub async fn seller_auctions(
    State(state): State<Arc<AppState>>,
    Path((address, raw_id)): Path<(String, String)>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let Some(auction_id) = parse_id(&raw_id) else {
        return bad_id(&notices, &raw_id);
    };
    let view = SellerAuctionsView::mount(
        state.context.current(),
        notices.clone(),
        address,
        auction_id,
    );
    view.settle().await;
    let page = view.render();
    view.unmount();

    page_response(&notices, "Auctions", page, None, render::seller)
}

/// `POST /seller/{address}/{auction_id}/cancel`
pub async fn cancel_auction(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path((address, raw_id)): Path<(String, String)>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let notices = Arc::new(NoticeBoard::new());

    let Some(auction_id) = parse_id(&raw_id) else {
        return bad_id(&notices, &raw_id);
    };
    let view = SellerAuctionsView::mount(
        state.context.current(),
        notices.clone(),
        address,
        auction_id,
    );
    view.settle().await;

    info!(request_id = %request_id, auction_id = %auction_id, "Cancelling auction");
    let status = view.cancel_selected().await;
    view.settle().await;
    let page = view.render();
    view.unmount();

    page_response(&notices, "Auctions", page, flash(&status), render::seller)
}

/// Resolve `id` against the current auction list and mount its detail
/// view with the initial queries settled.
async fn mount_detail(
    state: &AppState,
    notices: &Arc<NoticeBoard>,
    id: &str,
) -> Result<AuctionDetailView, Response> {
    let Some(auction_id) = parse_id(id) else {
        return Err(bad_id(notices, id));
    };
    let session = state.context.current();
    let auction = match find_auction(notices, &session, &auction_id).await {
        Lookup::Found(auction) => auction,
        Lookup::NotReady => {
            return Err(Html(render::loading(&notices.drain())).into_response())
        }
        Lookup::Missing => {
            let body = render::message(
                "Not found",
                &notices.drain(),
                &format!("Auction {auction_id} not found"),
            );
            return Err((StatusCode::NOT_FOUND, Html(body)).into_response());
        }
        Lookup::Failed => {
            let body = render::message(
                "Unavailable",
                &notices.drain(),
                "The auction service could not be reached",
            );
            return Err((StatusCode::BAD_GATEWAY, Html(body)).into_response());
        }
    };

    let view = AuctionDetailView::mount(session, notices.clone(), auction);
    view.settle().await;
    Ok(view)
}

enum Lookup {
    Found(Auction),
    NotReady,
    Missing,
    Failed,
}

async fn find_auction(notices: &NoticeBoard, session: &Session, auction_id: &AuctionId) -> Lookup {
    let Some(queries) = session.queries() else {
        return Lookup::NotReady;
    };
    match queries.list_auctions().await {
        Ok(auctions) => auctions
            .into_iter()
            .find(|a| &a.id == auction_id)
            .map_or(Lookup::Missing, Lookup::Found),
        Err(e) => {
            notices.report(&e);
            Lookup::Failed
        }
    }
}

fn parse_id(raw: &str) -> Option<Uint> {
    raw.parse().ok()
}

fn bad_id(notices: &NoticeBoard, raw: &str) -> Response {
    let body = render::message(
        "Bad request",
        &notices.drain(),
        &format!("Invalid auction id {raw:?}"),
    );
    (StatusCode::BAD_REQUEST, Html(body)).into_response()
}

fn flash(status: &CommandStatus) -> Option<String> {
    match status {
        CommandStatus::Settled(outcome) => Some(match &outcome.tx_hash {
            Some(hash) => format!("Transaction {hash} settled"),
            None => "Transaction settled".to_string(),
        }),
        _ => None,
    }
}

fn page_response<T>(
    notices: &NoticeBoard,
    title: &str,
    page: Page<T>,
    flash: Option<String>,
    body: fn(&T) -> String,
) -> Response {
    let notices = notices.drain();
    match page {
        Page::Loading => Html(render::loading(&notices)).into_response(),
        Page::Ready(page) => {
            Html(render::document(title, &notices, flash.as_deref(), &body(&page))).into_response()
        }
    }
}
