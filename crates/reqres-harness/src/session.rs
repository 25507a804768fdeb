// crates/reqres-harness/src/session.rs
// ============================================================================
// Module: API Session
// Description: Base-URL-prefixing HTTP session with diagnostic observers.
// Purpose: Issue blocking requests against one remote API for system tests.
// Dependencies: reqwest, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! [`ApiSession`] owns one blocking HTTP client and a fixed base URL. Every
//! request path is appended to the base URL verbatim; the session never adds,
//! removes or collapses slashes. After each response is buffered the session
//! notifies its [`RequestObserver`]s with a rendered trace of the request.
//!
//! Invariants:
//! - The URL sent is `base_url + path` followed by any query pairs.
//! - Redirects are not followed.
//! - Transport failures propagate without retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::observer::Exchange;
use crate::observer::RequestObserver;
use crate::response::ApiResponse;
use crate::trace::RequestTrace;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("reqres-harness/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by the session wrapper.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Base URL is unusable as a prefix.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl {
        /// Rejected base URL.
        url: String,
        /// Rejection reason.
        reason: String,
    },
    /// Request path cannot be sent verbatim after the base URL.
    #[error("invalid request path {path:?}: {reason}")]
    InvalidPath {
        /// Rejected path.
        path: String,
        /// Rejection reason.
        reason: &'static str,
    },
    /// Concatenated URL does not parse.
    #[error("invalid request url {url}: {source}")]
    InvalidUrl {
        /// Concatenated URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Default header name or value is invalid.
    #[error("invalid default header {name}: {reason}")]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Rejection reason.
        reason: String,
    },
    /// Request body could not be encoded as JSON.
    #[error("request body encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
    /// HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    /// Request could not be assembled.
    #[error("failed to build request for {url}: {source}")]
    Build {
        /// Request URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("http request to {url} failed: {source}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

// ============================================================================
// SECTION: Request
// ============================================================================

/// One request relative to the session base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    method: Method,
    /// Rooted relative path, e.g. `/api/users`.
    path: String,
    /// Query pairs appended in order.
    query: Vec<(String, String)>,
    /// Optional JSON body.
    body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query pairs.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Long-lived HTTP session bound to one base URL.
#[derive(Clone)]
pub struct ApiSession {
    /// Base URL every path is appended to.
    base_url: String,
    /// Pooled blocking client.
    client: Client,
    /// Headers attached to every request.
    default_headers: HeaderMap,
    /// Observers notified after each exchange.
    observers: Vec<Arc<dyn RequestObserver>>,
}

impl ApiSession {
    /// Starts building a session for the given base URL.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(base_url)
    }

    /// Creates a session with default settings and no observers.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the base URL is invalid or the client
    /// cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SessionError> {
        Self::builder(base_url).build()
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the absolute URL for a relative path.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidPath`] when `path` is not rooted or holds
    /// a segment or character that URL parsing would rewrite.
    pub fn url_for(&self, path: &str) -> Result<String, SessionError> {
        validate_path(path)?;
        Ok(format!("{}{path}", self.base_url))
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on invalid input or transport failure.
    pub fn get(&self, path: &str) -> Result<ApiResponse, SessionError> {
        self.send(ApiRequest::get(path))
    }

    /// Issues a GET request with query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on invalid input or transport failure.
    pub fn get_with_query<V: ToString>(
        &self,
        path: &str,
        query: &[(&str, V)],
    ) -> Result<ApiResponse, SessionError> {
        let request = query
            .iter()
            .fold(ApiRequest::get(path), |request, (key, value)| {
                request.with_query(*key, value.to_string())
            });
        self.send(request)
    }

    /// Issues a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on encoding failure, invalid input or transport failure.
    pub fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, SessionError> {
        let body = serde_json::to_value(body).map_err(SessionError::Encode)?;
        self.send(ApiRequest::post(path).with_json(body))
    }

    /// Issues a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on encoding failure, invalid input or transport failure.
    pub fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, SessionError> {
        let body = serde_json::to_value(body).map_err(SessionError::Encode)?;
        self.send(ApiRequest::patch(path).with_json(body))
    }

    /// Issues a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on invalid input or transport failure.
    pub fn delete(&self, path: &str) -> Result<ApiResponse, SessionError> {
        self.send(ApiRequest::delete(path))
    }

    /// Sends a request and buffers the response.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on invalid input or transport failure.
    pub fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError> {
        let raw = self.url_for(&request.path)?;
        let mut url = Url::parse(&raw).map_err(|source| SessionError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if url.as_str() != raw {
            return Err(SessionError::InvalidPath {
                path: request.path,
                reason: "URL parsing would rewrite the path",
            });
        }
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(key, value)| (key.as_str(), value.as_str())));
        }

        let mut builder =
            self.client.request(request.method, url.clone()).headers(self.default_headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let http_request = builder.build().map_err(|source| SessionError::Build {
            url: url.to_string(),
            source,
        })?;

        let trace = RequestTrace::capture(&http_request);
        let started = Instant::now();
        let response = self.client.execute(http_request).map_err(|source| {
            SessionError::Transport {
                url: trace.url.clone(),
                source,
            }
        })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(|source| SessionError::Transport {
            url: trace.url.clone(),
            source,
        })?;
        let elapsed = started.elapsed();

        let exchange = Exchange {
            trace: &trace,
            status,
            elapsed,
        };
        for observer in &self.observers {
            observer.observe(&exchange);
        }
        Ok(ApiResponse::new(trace.url.clone(), status, headers, body.to_vec()))
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`ApiSession`].
pub struct SessionBuilder {
    /// Base URL every path is appended to.
    base_url: String,
    /// Optional whole-request timeout; transport default when `None`.
    timeout: Option<Duration>,
    /// Extra or overriding default headers.
    headers: Vec<(String, String)>,
    /// Observers notified after each exchange.
    observers: Vec<Arc<dyn RequestObserver>>,
}

impl SessionBuilder {
    /// Creates a builder for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            headers: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Sets a whole-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header sent with every request, replacing any default of the same name.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Registers an observer.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the base URL or a header is invalid, or
    /// the HTTP client cannot be built.
    pub fn build(self) -> Result<ApiSession, SessionError> {
        validate_base_url(&self.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                SessionError::InvalidHeader {
                    name: name.clone(),
                    reason: err.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|err| SessionError::InvalidHeader {
                    name: name.clone(),
                    reason: err.to_string(),
                })?;
            default_headers.insert(header_name, header_value);
        }

        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(SessionError::Client)?;

        Ok(ApiSession {
            base_url: self.base_url,
            client,
            default_headers,
            observers: self.observers,
        })
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Ensures the base URL can be used as a raw string prefix.
fn validate_base_url(base_url: &str) -> Result<(), SessionError> {
    let reject = |reason: &str| SessionError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: reason.to_string(),
    };
    let parsed = Url::parse(base_url).map_err(|err| reject(&err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(reject("scheme must be http or https"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(reject("query and fragment are not allowed"));
    }
    if base_url.ends_with('/') {
        return Err(reject("trailing slash would double the path separator"));
    }
    let canonical = parsed.as_str();
    if canonical != base_url && canonical.strip_suffix('/') != Some(base_url) {
        return Err(reject("must already be in canonical form (lower-case host, no default port)"));
    }
    Ok(())
}

/// Ensures a request path is rooted and survives URL parsing byte for byte.
///
/// Dot segments (also percent-encoded), backslashes, `?` and `#` are rejected
/// because parsing would remove, rewrite or split them off the path.
fn validate_path(path: &str) -> Result<(), SessionError> {
    let reject = |reason: &'static str| SessionError::InvalidPath {
        path: path.to_string(),
        reason,
    };
    let Some(rest) = path.strip_prefix('/') else {
        return Err(reject("must start with '/'"));
    };
    if path.contains(['\\', '?', '#']) {
        return Err(reject("backslash, '?' and '#' are not allowed; pass query pairs separately"));
    }
    if path.chars().any(|c| c.is_ascii_control() || c == ' ') {
        return Err(reject("whitespace and control characters are not allowed"));
    }
    if rest.split('/').any(is_dot_segment) {
        return Err(reject("'.' and '..' segments are not allowed"));
    }
    Ok(())
}

/// Returns true for segments URL parsing treats as `.` or `..`.
fn is_dot_segment(segment: &str) -> bool {
    let lowered = segment.to_ascii_lowercase();
    matches!(lowered.as_str(), "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e")
}
