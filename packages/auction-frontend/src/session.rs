//! Provider session: one connection attempt per application run, handed
//! explicitly to every view.

use crate::command::AuctionCommands;
use crate::provider::{Connector, SharedProvider};
use crate::query::AuctionQueries;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// The service handle plus readiness. Cheap to clone.
///
/// A not-ready session hands out neither queries nor commands, so nothing
/// can reach the service before the handshake has completed.
#[derive(Clone, Default)]
pub struct Session {
    provider: Option<SharedProvider>,
}

impl Session {
    pub fn ready(provider: SharedProvider) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn not_ready() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub fn queries(&self) -> Option<AuctionQueries<'_>> {
        self.provider.as_ref().map(AuctionQueries::new)
    }

    pub fn commands(&self) -> Option<AuctionCommands<'_>> {
        self.provider.as_ref().map(AuctionCommands::new)
    }

    /// Whether both sessions wrap the very same handle.
    pub fn same_as(&self, other: &Session) -> bool {
        match (&self.provider, &other.provider) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.provider_name() {
            Some(name) => write!(f, "Session(ready, {name})"),
            None => write!(f, "Session(not ready)"),
        }
    }
}

/// Lazily establishes the session. The first `connect()` runs the
/// handshake; concurrent and later callers share its result. A failed
/// handshake leaves the context not ready for the rest of the run.
pub struct ProviderContext {
    connector: Box<dyn Connector>,
    cell: OnceCell<Session>,
}

impl ProviderContext {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            cell: OnceCell::new(),
        }
    }

    pub async fn connect(&self) -> Session {
        self.cell
            .get_or_init(|| async {
                match self.connector.connect().await {
                    Ok(provider) => {
                        info!(provider = provider.name(), "Auction service connected");
                        Session::ready(provider)
                    }
                    Err(e) => {
                        warn!(error = %e, "Auction service handshake failed; staying not ready");
                        Session::not_ready()
                    }
                }
            })
            .await
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some_and(Session::is_ready)
    }

    /// The settled session, or a not-ready one while the handshake runs.
    pub fn current(&self) -> Session {
        self.cell.get().cloned().unwrap_or_default()
    }
}
