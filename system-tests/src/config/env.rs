// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for Reqres system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Every variable is optional and
//! the defaults reproduce the fixed Reqres target exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional base URL override for the remote API.
    BaseUrl,
    /// Optional API key sent as `x-api-key`.
    ApiKey,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional artifact run root override.
    RunRoot,
    /// Toggle for the tracing request observer (`true`/`false` or `1`/`0`).
    TraceRequests,
}

impl SystemTestEnv {
    /// Every configuration key.
    pub const ALL: [Self; 5] =
        [Self::BaseUrl, Self::ApiKey, Self::TimeoutSeconds, Self::RunRoot, Self::TraceRequests];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "REQRES_BASE_URL",
            Self::ApiKey => "REQRES_API_KEY",
            Self::TimeoutSeconds => "REQRES_TIMEOUT_SEC",
            Self::RunRoot => "REQRES_RUN_ROOT",
            Self::TraceRequests => "REQRES_TRACE_REQUESTS",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors raised while reading the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Variable is set but not valid UTF-8.
    #[error("{0} must be valid UTF-8")]
    NotUtf8(String),
    /// Variable is set but empty or whitespace.
    #[error("{0} must not be empty")]
    Empty(String),
    /// Timeout is not a positive integer.
    #[error("{name} must be a positive integer number of seconds")]
    InvalidTimeout {
        /// Variable name.
        name: String,
    },
    /// Boolean flag is not a recognized literal.
    #[error("{name} must be 1, 0, true, or false")]
    InvalidBool {
        /// Variable name.
        name: String,
    },
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub base_url: String,
    /// Optional API key sent as `x-api-key`.
    pub api_key: Option<String>,
    /// Optional request timeout; transport default when `None`.
    pub timeout: Option<Duration>,
    /// Optional artifact run root override.
    pub run_root: Option<PathBuf>,
    /// Emit request traces through `tracing`.
    pub trace_requests: bool,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: None,
            run_root: None,
            trace_requests: true,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an environment value is not valid UTF-8, is
    /// empty, or fails validation (for example, an invalid timeout or boolean).
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url =
            read_env_nonempty(SystemTestEnv::BaseUrl.as_str())?.unwrap_or(defaults.base_url);
        let api_key = read_env_nonempty(SystemTestEnv::ApiKey.as_str())?;
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let trace_requests = parse_bool_env(
            SystemTestEnv::TraceRequests.as_str(),
            read_env_nonempty(SystemTestEnv::TraceRequests.as_str())?,
            defaults.trace_requests,
        )?;
        Ok(Self {
            base_url,
            api_key,
            timeout,
            run_root,
            trace_requests,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::NotUtf8`] when the variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::NotUtf8(name.to_string()))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(name.to_string())),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidTimeout {
        name: name.to_string(),
    };
    let secs: u64 = raw.trim().parse().map_err(|_| invalid())?;
    if secs == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a boolean environment variable, falling back to `default` when unset.
fn parse_bool_env(name: &str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(ConfigError::InvalidBool {
        name: name.to_string(),
    })
}
