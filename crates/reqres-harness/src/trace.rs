// crates/reqres-harness/src/trace.rs
// ============================================================================
// Module: Request Trace
// Description: Command-line-equivalent rendering of outgoing HTTP requests.
// Purpose: Turn a prepared request into a copyable curl command.
// Dependencies: reqwest, serde
// ============================================================================

//! ## Overview
//! A [`RequestTrace`] is captured from the fully prepared request right before
//! it is executed, so the rendered command reflects the exact method, URL,
//! headers and body that went on the wire.
//!
//! Invariants:
//! - Headers are sorted by name for stable output.
//! - Values of sensitive headers are replaced with [`REDACTED`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::blocking::Body;
use reqwest::blocking::Request;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder rendered in place of sensitive header values.
pub const REDACTED: &str = "[REDACTED]";

/// Header names whose values never appear in traces.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key"];

// ============================================================================
// SECTION: Request Trace
// ============================================================================

/// Snapshot of an outgoing request used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTrace {
    /// HTTP method, upper case.
    pub method: String,
    /// Absolute request URL including the query string.
    pub url: String,
    /// Header name/value pairs sorted by name.
    pub headers: Vec<(String, String)>,
    /// Request body rendered as UTF-8 (lossy) when present.
    pub body: Option<String>,
}

impl RequestTrace {
    /// Captures a trace from a prepared request.
    #[must_use]
    pub fn capture(request: &Request) -> Self {
        let mut headers: Vec<(String, String)> = request
            .headers()
            .iter()
            .map(|(name, value)| {
                let name = name.as_str().to_string();
                let value = if is_sensitive(&name) {
                    REDACTED.to_string()
                } else {
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                };
                (name, value)
            })
            .collect();
        headers.sort();
        let body = request
            .body()
            .and_then(Body::as_bytes)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        Self {
            method: request.method().as_str().to_string(),
            url: request.url().to_string(),
            headers,
            body,
        }
    }

    /// Renders the request as a `curl` command line.
    #[must_use]
    pub fn to_curl(&self) -> String {
        let mut parts = vec!["curl".to_string(), "-X".to_string(), self.method.clone()];
        for (name, value) in &self.headers {
            parts.push("-H".to_string());
            parts.push(shell_quote(&format!("{name}: {value}")));
        }
        if let Some(body) = &self.body {
            parts.push("-d".to_string());
            parts.push(shell_quote(body));
        }
        parts.push(shell_quote(&self.url));
        parts.join(" ")
    }
}

impl fmt::Display for RequestTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_curl())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Quotes a value for POSIX shells using single quotes.
#[must_use]
pub fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Returns true when the header value must be redacted.
fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|candidate| candidate.eq_ignore_ascii_case(name))
}
