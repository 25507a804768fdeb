// crates/reqres-harness/src/observer.rs
// ============================================================================
// Module: Request Observers
// Description: Diagnostic hooks invoked after every completed exchange.
// Purpose: Decouple request logging and transcripts from the response path.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! A [`RequestObserver`] is notified once per completed request with the
//! rendered [`RequestTrace`] and a short response summary. Observers run after
//! the body has been buffered and cannot change what the caller receives, so
//! logging can be disabled or redirected without touching scenario logic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;

use crate::trace::RequestTrace;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tracing target used for request traces.
pub const TRACE_TARGET: &str = "reqres_harness::trace";

// ============================================================================
// SECTION: Observer Trait
// ============================================================================

/// One completed request/response exchange.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    /// Rendered outgoing request.
    pub trace: &'a RequestTrace,
    /// Response status code.
    pub status: StatusCode,
    /// Time from send to fully buffered body.
    pub elapsed: Duration,
}

/// Receives a notification for every completed exchange.
pub trait RequestObserver: Send + Sync {
    /// Observes a completed exchange.
    fn observe(&self, exchange: &Exchange<'_>);
}

// ============================================================================
// SECTION: Tracing Observer
// ============================================================================

/// Emits each exchange as a `tracing` event carrying the curl command.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn observe(&self, exchange: &Exchange<'_>) {
        tracing::info!(
            target: TRACE_TARGET,
            method = %exchange.trace.method,
            url = %exchange.trace.url,
            status = exchange.status.as_u16(),
            elapsed_ms = elapsed_millis(exchange.elapsed),
            "{}",
            exchange.trace.to_curl()
        );
    }
}

// ============================================================================
// SECTION: Transcript Observer
// ============================================================================

/// Recorded exchange kept by [`TranscriptObserver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Response status code.
    pub status: u16,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Curl rendering of the request.
    pub curl: String,
}

/// Collects exchanges in memory for later artifact output.
#[derive(Debug, Clone, Default)]
pub struct TranscriptObserver {
    /// Shared transcript buffer.
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl TranscriptObserver {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl RequestObserver for TranscriptObserver {
    fn observe(&self, exchange: &Exchange<'_>) {
        let Ok(mut guard) = self.entries.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: exchange.trace.method.clone(),
            url: exchange.trace.url.clone(),
            status: exchange.status.as_u16(),
            elapsed_ms: elapsed_millis(exchange.elapsed),
            curl: exchange.trace.to_curl(),
        });
    }
}

// ============================================================================
// SECTION: Callback Observer
// ============================================================================

/// Callback handler signature used by [`CallbackObserver`].
type ObserverHandler = dyn Fn(&Exchange<'_>) + Send + Sync;

/// Observer that forwards exchanges to a closure.
#[derive(Clone)]
pub struct CallbackObserver {
    /// Handler invoked for each exchange.
    handler: Arc<ObserverHandler>,
}

impl CallbackObserver {
    /// Creates a callback observer from a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Exchange<'_>) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl RequestObserver for CallbackObserver {
    fn observe(&self, exchange: &Exchange<'_>) {
        (self.handler)(exchange);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a duration to whole milliseconds, saturating on overflow.
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
