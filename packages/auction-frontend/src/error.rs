//! Error types for the frontend.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Startup and infrastructure errors.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// RPC communication error.
    Rpc(String),
    /// Signing key missing or unusable.
    Signer(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Signer(msg) => write!(f, "signer error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config(_) | Error::Signer(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Rpc(_) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}

/// A failed call to the auction service, whatever the provider raised.
///
/// This is the only error views ever see; every one of them ends up at the
/// [`ErrorReporter`](crate::reporter::ErrorReporter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalServiceError {
    pub method: &'static str,
    pub message: String,
}

impl ExternalServiceError {
    pub fn new(method: &'static str, message: impl Into<String>) -> Self {
        Self {
            method,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExternalServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.method, self.message)
    }
}

impl std::error::Error for ExternalServiceError {}

impl From<Error> for ExternalServiceError {
    fn from(e: Error) -> Self {
        ExternalServiceError::new("provider", e.to_string())
    }
}
