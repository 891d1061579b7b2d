//! Request counters for service monitoring.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use utoipa::ToSchema;

/// Service metrics.
#[derive(Default)]
pub struct Metrics {
    /// Total conversion requests received.
    pub requests_total: AtomicU64,
    /// Requests rejected by validation.
    pub requests_rejected: AtomicU64,
    /// Requests answered with a conversion.
    pub conversions_found: AtomicU64,
    /// Requests answered with no conversion path.
    pub conversions_not_found: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_received(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn conversion_found(&self) {
        self.conversions_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn conversion_not_found(&self) {
        self.conversions_not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            conversions_found: self.conversions_found.load(Ordering::Relaxed),
            conversions_not_found: self.conversions_not_found.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_rejected: u64,
    pub conversions_found: u64,
    pub conversions_not_found: u64,
}
