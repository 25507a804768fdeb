// crates/reqres-harness/src/expect.rs
// ============================================================================
// Module: Expectations
// Description: Exact-match checks on status codes and JSON fields.
// Purpose: Report literal mismatches with both expected and actual values.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Scenarios compare responses against literal fixture values. Each check
//! returns an [`ExpectationError`] carrying the expected and the observed value
//! instead of panicking, so failures propagate through `?` like every other
//! scenario error. Comparisons are exact `serde_json::Value` equality.

use serde_json::Value;
use thiserror::Error;

use crate::response::ApiResponse;

/// A literal expectation that did not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpectationError {
    /// Status code differs.
    #[error("expected status {expected}, got {actual}")]
    Status {
        /// Expected status.
        expected: u16,
        /// Observed status.
        actual: u16,
    },
    /// Field value differs.
    #[error("expected {pointer} to equal {expected}, got {actual}")]
    Field {
        /// JSON pointer of the field.
        pointer: String,
        /// Expected value.
        expected: Value,
        /// Observed value.
        actual: Value,
    },
    /// Field is absent.
    #[error("expected field {pointer} to be present")]
    MissingField {
        /// JSON pointer of the field.
        pointer: String,
    },
    /// Array length differs.
    #[error("expected {pointer} to hold {expected} items, got {actual}")]
    Length {
        /// JSON pointer of the array.
        pointer: String,
        /// Expected length.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
    /// Field is not an array.
    #[error("expected {pointer} to be an array, got {actual}")]
    NotAnArray {
        /// JSON pointer of the field.
        pointer: String,
        /// Observed value.
        actual: Value,
    },
    /// Body or object is not empty.
    #[error("expected an empty body, got {actual}")]
    NotEmpty {
        /// Observed body.
        actual: String,
    },
}

/// Checks the response status code.
///
/// # Errors
///
/// Returns [`ExpectationError::Status`] on mismatch.
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), ExpectationError> {
    let actual = response.status_code();
    if actual == expected {
        Ok(())
    } else {
        Err(ExpectationError::Status {
            expected,
            actual,
        })
    }
}

/// Checks that the field at `pointer` equals `expected` exactly.
///
/// # Errors
///
/// Returns [`ExpectationError::MissingField`] or [`ExpectationError::Field`].
pub fn expect_field(
    body: &Value,
    pointer: &str,
    expected: impl Into<Value>,
) -> Result<(), ExpectationError> {
    let expected = expected.into();
    let actual = lookup(body, pointer)?;
    if *actual == expected {
        Ok(())
    } else {
        Err(ExpectationError::Field {
            pointer: pointer.to_string(),
            expected,
            actual: actual.clone(),
        })
    }
}

/// Checks the length of the array at `pointer`.
///
/// # Errors
///
/// Returns [`ExpectationError`] when the field is missing, not an array, or
/// has a different length.
pub fn expect_len(body: &Value, pointer: &str, expected: usize) -> Result<(), ExpectationError> {
    let actual = lookup(body, pointer)?;
    let Some(items) = actual.as_array() else {
        return Err(ExpectationError::NotAnArray {
            pointer: pointer.to_string(),
            actual: actual.clone(),
        });
    };
    if items.len() == expected {
        Ok(())
    } else {
        Err(ExpectationError::Length {
            pointer: pointer.to_string(),
            expected,
            actual: items.len(),
        })
    }
}

/// Checks that the body is the empty JSON object `{}`.
///
/// # Errors
///
/// Returns [`ExpectationError::NotEmpty`] otherwise.
pub fn expect_empty_object(body: &Value) -> Result<(), ExpectationError> {
    match body.as_object() {
        Some(map) if map.is_empty() => Ok(()),
        _ => Err(ExpectationError::NotEmpty {
            actual: body.to_string(),
        }),
    }
}

/// Checks that the response carries no body bytes.
///
/// # Errors
///
/// Returns [`ExpectationError::NotEmpty`] otherwise.
pub fn expect_empty_body(response: &ApiResponse) -> Result<(), ExpectationError> {
    if response.is_empty() {
        Ok(())
    } else {
        Err(ExpectationError::NotEmpty {
            actual: String::from_utf8_lossy(response.body()).into_owned(),
        })
    }
}

/// Resolves a JSON pointer or reports the field as missing.
fn lookup<'a>(body: &'a Value, pointer: &str) -> Result<&'a Value, ExpectationError> {
    body.pointer(pointer).ok_or_else(|| ExpectationError::MissingField {
        pointer: pointer.to_string(),
    })
}
