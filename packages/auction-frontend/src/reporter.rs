//! Single sink for failed service calls.

use crate::error::ExternalServiceError;
use crate::metrics::METRICS;
use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::error;

/// Receives every failed query or command. Pass-through: no classification,
/// retry or suppression.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &ExternalServiceError);
}

pub type SharedReporter = Arc<dyn ErrorReporter>;

const DEFAULT_CAPACITY: usize = 32;

/// Logs each error and keeps it until its request renders and drains it.
/// One board per request.
/// Oldest notices are dropped past capacity.
pub struct NoticeBoard {
    notices: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notices: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub fn drain(&self) -> Vec<String> {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for NoticeBoard {
    fn report(&self, err: &ExternalServiceError) {
        METRICS.reported_errors.fetch_add(1, Ordering::Relaxed);
        error!(method = err.method, error = %err.message, "Auction service call failed");

        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        if notices.len() >= self.capacity {
            notices.pop_front();
        }
        notices.push_back(err.to_string());
    }
}
