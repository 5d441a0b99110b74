//! Application state shared across handlers.

use crate::config::{Config, ProviderMode};
use crate::provider::{MemoryConnector, MemoryProvider, RpcConnector};
use crate::session::ProviderContext;
use std::sync::atomic::AtomicU64;
use std::time::Instant;
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub context: ProviderContext,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Pick the connector for the configured provider. Nothing connects
    /// until [`ProviderContext::connect`] is awaited.
    pub fn new(config: Config) -> Self {
        let context = match config.provider {
            ProviderMode::Rpc => ProviderContext::new(RpcConnector::new(config.clone())),
            ProviderMode::Memory => {
                info!(account = %config.demo_account, "Using in-memory auction service");
                let demo = MemoryProvider::demo(config.demo_account.clone(), now_secs());
                ProviderContext::new(MemoryConnector::new(demo))
            }
        };
        Self::with_context(config, context)
    }

    pub fn with_context(config: Config, context: ProviderContext) -> Self {
        Self {
            config,
            context,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
