//! # Auction Frontend
//!
//! Web frontend for a peer-to-peer auction contract on NEAR. Lists
//! auctions, shows offers, and submits bids, trades and cancellations
//! through a pluggable auction service (JSON-RPC or in-memory).
//!
//! ## Quick Start
//! ```bash
//! AUCTION_PROVIDER=memory cargo run --bin auction-frontend
//! ```
//!
//! ## Endpoints
//! - `GET /` - Auction list
//! - `GET /auction/{id}` - Auction detail and offer form
//! - `GET /buyer/{address}` - Offers placed by an account
//! - `GET /seller/{address}/{auction_id}` - Auctions posted by an account
//! - `GET /health`, `GET /ready`, `GET /metrics` - Health, readiness and metrics

pub mod command;
pub mod config;
mod error;
mod handlers;
pub mod metrics;
pub mod middleware;
pub mod provider;
pub mod query;
pub mod render;
pub mod reporter;
mod response;
mod router;
pub mod scope;
pub mod session;
pub mod signer;
mod state;
pub mod views;

pub use config::Config;
pub use error::{Error, ExternalServiceError};
pub use router::create as create_router;
pub use state::AppState;
