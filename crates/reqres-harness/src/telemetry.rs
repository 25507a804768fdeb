// crates/reqres-harness/src/telemetry.rs
// ============================================================================
// Module: Telemetry
// Description: Tracing subscriber bootstrap for harness consumers.
// Purpose: Route request traces to a log sink with an env-driven filter.
// Dependencies: tracing-subscriber
// ============================================================================

//! Installs the `tracing` subscriber that receives request traces.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a global subscriber reading `RUST_LOG` (default `info`).
///
/// Output goes through the libtest writer so it is captured per test. Safe to
/// call multiple times; later calls are no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = fmt::layer().with_target(true).with_test_writer().compact();
    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
