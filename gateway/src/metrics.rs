use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the HTTP surface, exposed as JSON at `/metrics/http`.
#[derive(Default)]
pub struct HttpMetrics {
    opens_total: AtomicU64,
    opens_failed: AtomicU64,
    events_published: AtomicU64,
    dropped_events: AtomicU64,
    reject_origin: AtomicU64,
    reject_rate_limit: AtomicU64,
    reject_body_limit: AtomicU64,
}

#[derive(Clone, Debug, Serialize)]
pub struct HttpMetricsSnapshot {
    pub opens_total: u64,
    pub opens_failed: u64,
    pub events_published: u64,
    pub dropped_events: u64,
    pub reject_origin: u64,
    pub reject_rate_limit: u64,
    pub reject_body_limit: u64,
}

impl HttpMetrics {
    pub fn inc_opens_total(&self) {
        self.opens_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_opens_failed(&self) {
        self.opens_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_events_published(&self, count: u64) {
        self.events_published.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_dropped_events(&self) {
        self.dropped_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reject_origin(&self) {
        self.reject_origin.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reject_rate_limit(&self) {
        self.reject_rate_limit.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reject_body_limit(&self) {
        self.reject_body_limit.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HttpMetricsSnapshot {
        HttpMetricsSnapshot {
            opens_total: self.opens_total.load(Ordering::Relaxed),
            opens_failed: self.opens_failed.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            dropped_events: self.dropped_events.load(Ordering::Relaxed),
            reject_origin: self.reject_origin.load(Ordering::Relaxed),
            reject_rate_limit: self.reject_rate_limit.load(Ordering::Relaxed),
            reject_body_limit: self.reject_body_limit.load(Ordering::Relaxed),
        }
    }
}
