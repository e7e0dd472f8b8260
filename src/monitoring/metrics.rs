//! In-process counters for documents/events processed by
//! [`crate::validate_document`]'s callers. Kept deliberately small: the
//! engine itself holds no state across calls, so these counters live in
//! the caller (CLI / HTTP interface stub) and are reset on process
//! restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::models::report::{Severity, ValidationReport};

/// Snapshot of accumulated validation metrics, suitable for exposing on
/// a `/metrics`-style endpoint or logging at shutdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub uptime_seconds: u64,
    pub documents_processed: u64,
    pub documents_valid: u64,
    pub documents_invalid: u64,
    pub events_validated: u64,
    pub errors_by_type: HashMap<String, u64>,
    pub warnings_by_type: HashMap<String, u64>,
}

/// Accumulates [`ValidationReport`] outcomes across calls. One instance
/// per process; shared via `Arc` between the HTTP interface's handlers.
pub struct SystemMonitor {
    start_time: Instant,
    documents_processed: Arc<AtomicU64>,
    documents_valid: Arc<AtomicU64>,
    documents_invalid: Arc<AtomicU64>,
    events_validated: Arc<AtomicU64>,
    errors_by_type: Arc<Mutex<HashMap<String, u64>>>,
    warnings_by_type: Arc<Mutex<HashMap<String, u64>>>,
}

impl SystemMonitor {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            documents_processed: Arc::new(AtomicU64::new(0)),
            documents_valid: Arc::new(AtomicU64::new(0)),
            documents_invalid: Arc::new(AtomicU64::new(0)),
            events_validated: Arc::new(AtomicU64::new(0)),
            errors_by_type: Arc::new(Mutex::new(HashMap::new())),
            warnings_by_type: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Folds the outcome of one `validate_document` call into the
    /// running counters.
    pub fn record(&self, report: &ValidationReport) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.events_validated
            .fetch_add(report.event_count as u64, Ordering::Relaxed);

        if report.valid {
            self.documents_valid.fetch_add(1, Ordering::Relaxed);
        } else {
            self.documents_invalid.fetch_add(1, Ordering::Relaxed);
        }

        for error in &report.errors {
            let mut table = match error.severity {
                Severity::Error => self.errors_by_type.lock(),
                Severity::Warning => self.warnings_by_type.lock(),
            };
            *table.entry(error.error_type.clone()).or_insert(0) += 1;
        }
    }

    pub fn snapshot(&self) -> ValidationMetrics {
        ValidationMetrics {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            documents_valid: self.documents_valid.load(Ordering::Relaxed),
            documents_invalid: self.documents_invalid.load(Ordering::Relaxed),
            events_validated: self.events_validated.load(Ordering::Relaxed),
            errors_by_type: self.errors_by_type.lock().clone(),
            warnings_by_type: self.warnings_by_type.lock().clone(),
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}
