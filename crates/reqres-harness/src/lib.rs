// crates/reqres-harness/src/lib.rs
// ============================================================================
// Module: Reqres Harness
// Description: Session wrapper, schema loading, and expectations for API tests.
// Purpose: Provide the building blocks for black-box Reqres system tests.
// Dependencies: reqwest, jsonschema, serde_json, tracing
// ============================================================================

//! ## Overview
//! `reqres-harness` wraps a blocking HTTP client so every request path is
//! prefixed with one fixed base URL, renders each outgoing request as a
//! reproducible `curl` command for diagnostic observers, and loads JSON
//! schemas used to validate response payloads structurally.
//!
//! Invariants:
//! - Request URLs are `base_url + path` with no normalization.
//! - Observers see every completed exchange and never alter the response.
//! - Schema violations and expectation failures are distinct error types.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod expect;
pub mod observer;
pub mod response;
pub mod schema;
pub mod session;
pub mod telemetry;
pub mod trace;


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use expect::ExpectationError;
pub use observer::CallbackObserver;
pub use observer::Exchange;
pub use observer::RequestObserver;
pub use observer::TracingObserver;
pub use observer::TranscriptEntry;
pub use observer::TranscriptObserver;
pub use reqwest::Method;
pub use reqwest::StatusCode;
pub use response::ApiResponse;
pub use response::ResponseError;
pub use schema::ResponseSchema;
pub use schema::SchemaError;
pub use schema::SchemaLoader;
pub use schema::SchemaValidator;
pub use schema::SchemaViolation;
pub use schema::load_json_schema;
pub use session::ApiRequest;
pub use session::ApiSession;
pub use session::SessionBuilder;
pub use session::SessionError;
pub use trace::RequestTrace;
