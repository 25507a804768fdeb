// system-tests/tests/suites/auth.rs
// ============================================================================
// Module: Auth Scenarios
// Description: Live scenarios for registration and login.
// Purpose: Pin the fixture token and the missing-password rejection.
// Dependencies: reqres-harness, serde_json
// ============================================================================

//! ## Overview
//! Live scenarios for `/api/register` and `/api/login`.

use std::error::Error;

use helpers::scenario::conforming_json;
use helpers::scenario::run_scenario;
use reqres_harness::ResponseSchema;
use reqres_harness::StatusCode;
use reqres_harness::expect::expect_field;
use reqres_harness::expect::expect_status;
use serde_json::json;

use crate::helpers;

const PATH_REGISTER: &str = "/api/register";
const PATH_LOGIN: &str = "/api/login";
const EMAIL: &str = "emma.wong@reqres.in";
const TOKEN: &str = "QpwL5tke4Pnpja7X3";

#[test]
fn register_successful() -> Result<(), Box<dyn Error>> {
    run_scenario("register_successful", "registration issued the fixture token", |session| {
        let response = session.post(PATH_REGISTER, &json!({"email": EMAIL, "password": "12345"}))?;
        let body = conforming_json(&response, ResponseSchema::RegisterSuccessful)?;
        expect_status(&response, 200)?;
        expect_field(&body, "/id", 3)?;
        expect_field(&body, "/token", TOKEN)?;
        Ok(())
    })
}

#[test]
fn register_missing_password() -> Result<(), Box<dyn Error>> {
    run_scenario("register_missing_password", "registration without password rejected", |session| {
        let response = session.post(PATH_REGISTER, &json!({"email": EMAIL}))?;
        let body = conforming_json(&response, ResponseSchema::RegisterUnsuccessful)?;
        expect_status(&response, StatusCode::BAD_REQUEST.as_u16())?;
        expect_field(&body, "/error", "Missing password")?;
        Ok(())
    })
}

#[test]
fn login_successful() -> Result<(), Box<dyn Error>> {
    run_scenario("login_successful", "login issued the fixture token", |session| {
        let response = session.post(PATH_LOGIN, &json!({"email": EMAIL, "password": "cyg123"}))?;
        let body = conforming_json(&response, ResponseSchema::LoginSuccessful)?;
        expect_status(&response, StatusCode::OK.as_u16())?;
        expect_field(&body, "/token", TOKEN)?;
        Ok(())
    })
}
