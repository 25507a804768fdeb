// system-tests/src/lib.rs
// ============================================================================
// Module: Reqres System Tests Library
// Description: Shared configuration for live Reqres API scenarios.
// Purpose: Provide common utilities for the system-test binaries.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the live API scenarios in
//! `system-tests/tests`. Scenarios only build with the `system-tests` feature
//! because they reach the public network.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
