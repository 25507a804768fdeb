// system-tests/tests/helpers/scenario.rs
// ============================================================================
// Module: Scenario Runner
// Description: Shared lifecycle for a single live API scenario.
// Purpose: Run scenarios one at a time and record transcript and summary.
// Dependencies: reqres-harness, tracing
// ============================================================================

use std::error::Error;
use std::io;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::PoisonError;

use reqres_harness::ApiResponse;
use reqres_harness::ApiSession;
use reqres_harness::ResponseSchema;
use reqres_harness::SchemaLoader;
use reqres_harness::TranscriptObserver;
use reqres_harness::telemetry;
use serde_json::Value;

use super::artifacts::TRANSCRIPT_JSON;
use super::artifacts::TestReporter;
use super::artifacts::scenario_artifacts;
use super::session::live_session;

/// Serializes scenarios within a test binary.
///
/// Scenarios act on shared remote fixtures, so one must finish before the next
/// begins even when libtest runs tests on several threads.
fn scenario_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `body` against a fresh live session and records the outcome.
///
/// The transcript and summary are written whether the scenario passes or
/// fails; the scenario's own error is returned unchanged.
pub fn run_scenario<F>(test_name: &str, note: &str, body: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&ApiSession) -> Result<(), Box<dyn Error>>,
{
    run_with_reporter(|| TestReporter::new(test_name), test_name, note, body)
}

/// Runs `body` with a reporter created once the scenario holds the serial lock.
///
/// A failed transcript write is recorded as a note and does not change the
/// reported status.
pub fn run_with_reporter<R, F>(
    reporter: R,
    test_name: &str,
    note: &str,
    body: F,
) -> Result<(), Box<dyn Error>>
where
    R: FnOnce() -> io::Result<TestReporter>,
    F: FnOnce(&ApiSession) -> Result<(), Box<dyn Error>>,
{
    let _serial = scenario_lock();
    telemetry::init();
    let mut reporter = reporter()?;
    tracing::info!(
        test = test_name,
        artifacts = %reporter.artifacts().root().display(),
        "scenario started"
    );
    let transcript = TranscriptObserver::new();
    let outcome = live_session(&transcript).and_then(|session| body(&session));

    let (status, mut notes) = match &outcome {
        Ok(()) => ("pass", vec![note.to_string()]),
        Err(err) => {
            tracing::error!(test = test_name, error = %err, "scenario failed");
            ("fail", vec![err.to_string()])
        }
    };
    let mut artifacts = scenario_artifacts();
    if let Err(err) = reporter.artifacts().write_json(TRANSCRIPT_JSON, &transcript.entries()) {
        tracing::warn!(test = test_name, error = %err, "transcript not written");
        notes.push(format!("{TRANSCRIPT_JSON} not written: {err}"));
        artifacts.retain(|name| name != TRANSCRIPT_JSON);
    }
    reporter.finish(status, notes, artifacts)?;
    drop(reporter);
    outcome
}

/// Decodes the response body and validates it against `schema`.
///
/// Structural mismatches surface as [`reqres_harness::SchemaViolation`], kept
/// apart from the literal expectation failures checked afterwards.
pub fn conforming_json(
    response: &ApiResponse,
    schema: ResponseSchema,
) -> Result<Value, Box<dyn Error>> {
    let body = response.json()?;
    SchemaLoader::default().validator(schema)?.validate(&body)?;
    Ok(body)
}
