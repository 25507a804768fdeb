// crates/reqres-harness/src/response.rs
// ============================================================================
// Module: API Response
// Description: Buffered HTTP response returned by the session wrapper.
// Purpose: Expose status, headers and a re-readable body to scenarios.
// Dependencies: reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The session reads the response body once and hands back an [`ApiResponse`]
//! so a scenario can inspect the status, validate the JSON body against a
//! schema, and assert on fields without consuming anything twice.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while decoding a response body.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Body was empty when JSON was expected.
    #[error("response body is empty")]
    Empty,
    /// Body is not valid UTF-8.
    #[error("response body is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Body is not valid JSON or does not match the requested type.
    #[error("response body is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// HTTP response with a fully buffered body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// URL the request was sent to.
    url: String,
    /// Response status code.
    status: StatusCode,
    /// Response headers.
    headers: HeaderMap,
    /// Raw response body.
    body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(url: impl Into<String>, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body,
        }
    }

    /// Returns the URL the request was sent to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as an integer.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns true when the body has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::Utf8`] when the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, ResponseError> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// Parses the body as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError`] when the body is empty or not valid JSON.
    pub fn json(&self) -> Result<Value, ResponseError> {
        self.json_as()
    }

    /// Parses the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError`] when the body is empty or does not decode as `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, ResponseError> {
        if self.body.is_empty() {
            return Err(ResponseError::Empty);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}
