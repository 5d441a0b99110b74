//! Per-view task ownership for background queries. Tearing a view down
//! drops its pending reads and late results never get applied.

use crate::metrics::METRICS;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct ViewScope {
    token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `work` in the background and hand its output to `apply`, unless
    /// the scope is torn down first.
    pub fn spawn<T, W, A>(&self, work: W, apply: A)
    where
        T: Send + 'static,
        W: Future<Output = T> + Send + 'static,
        A: FnOnce(T) + Send + 'static,
    {
        let token = self.token.clone();
        let handle = tokio::spawn(async move {
            let output = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                out = work => Some(out),
            };
            match output {
                Some(out) if !token.is_cancelled() => apply(out),
                _ => {
                    METRICS.discarded_results.fetch_add(1, Ordering::Relaxed);
                    debug!("View torn down; discarding pending result");
                }
            }
        });

        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Wait until every background task has finished.
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
                tasks.drain(..).collect()
            };
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                let _ = handle.await;
            }
        }
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
