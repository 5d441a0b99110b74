//! JSON response types.

use serde::Serialize;

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub contract_id: String,
    pub provider: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
    pub ready: bool,
}
