//! Prometheus metrics (lock-free atomics).

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Reads ---
    pub queries_total: AtomicU64,
    pub query_errors: AtomicU64,

    // --- Writes ---
    pub commands_total: AtomicU64,
    pub command_errors: AtomicU64,

    // --- Views ---
    pub reported_errors: AtomicU64,
    /// Results that settled after their view was torn down.
    pub discarded_results: AtomicU64,

    // --- RPC ---
    pub rpc_failovers: AtomicU64,
    pub rpc_errors: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            queries_total: AtomicU64::new(0),
            query_errors: AtomicU64::new(0),
            commands_total: AtomicU64::new(0),
            command_errors: AtomicU64::new(0),
            reported_errors: AtomicU64::new(0),
            discarded_results: AtomicU64::new(0),
            rpc_failovers: AtomicU64::new(0),
            rpc_errors: AtomicU64::new(0),
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, ready: bool) -> String {
        let queries_total = self.queries_total.load(Ordering::Relaxed);
        let query_errors = self.query_errors.load(Ordering::Relaxed);
        let commands_total = self.commands_total.load(Ordering::Relaxed);
        let command_errors = self.command_errors.load(Ordering::Relaxed);
        let reported_errors = self.reported_errors.load(Ordering::Relaxed);
        let discarded = self.discarded_results.load(Ordering::Relaxed);
        let rpc_failovers = self.rpc_failovers.load(Ordering::Relaxed);
        let rpc_errors = self.rpc_errors.load(Ordering::Relaxed);
        let ready = u8::from(ready);

        format!(
            "\
# HELP auction_queries_total Read calls issued to the auction service.\n\
# TYPE auction_queries_total counter\n\
auction_queries_total {queries_total}\n\
# HELP auction_query_errors_total Failed read calls.\n\
# TYPE auction_query_errors_total counter\n\
auction_query_errors_total {query_errors}\n\
# HELP auction_commands_total Transactions submitted to the auction service.\n\
# TYPE auction_commands_total counter\n\
auction_commands_total {commands_total}\n\
# HELP auction_command_errors_total Rejected or failed transactions.\n\
# TYPE auction_command_errors_total counter\n\
auction_command_errors_total {command_errors}\n\
# HELP auction_reported_errors_total Errors surfaced to the user.\n\
# TYPE auction_reported_errors_total counter\n\
auction_reported_errors_total {reported_errors}\n\
# HELP auction_discarded_results_total Results dropped because their view was gone.\n\
# TYPE auction_discarded_results_total counter\n\
auction_discarded_results_total {discarded}\n\
# HELP auction_rpc_failovers_total RPC primary-to-fallback failovers.\n\
# TYPE auction_rpc_failovers_total counter\n\
auction_rpc_failovers_total {rpc_failovers}\n\
# HELP auction_rpc_errors_total RPC errors.\n\
# TYPE auction_rpc_errors_total counter\n\
auction_rpc_errors_total {rpc_errors}\n\
# HELP auction_session_ready Whether the provider session is ready.\n\
# TYPE auction_session_ready gauge\n\
auction_session_ready {ready}\n"
        )
    }
}
