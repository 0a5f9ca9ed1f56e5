use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::assessment::{assessment_router, AssessmentState, RiskEngine};
use crate::profile::{fields, ProfileRecord};

pub(super) const TEST_SEED: u64 = 7;

pub(super) fn engine() -> RiskEngine {
    RiskEngine::default()
}

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

/// Salaried resident with a clean bureau file; every positive rule but
/// employment fires and the raw score lands exactly on the ceiling.
pub(super) fn prime_applicant() -> ProfileRecord {
    ProfileRecord::new()
        .with(fields::RESIDENT_STATUS, "Indian")
        .with(fields::GEO_RISK, "Low")
        .with(fields::DECLARED_INCOME, 600_000_i64)
        .with(fields::INCOME_VERIFIED, true)
        .with(fields::EXISTING_EMI, 5_000_i64)
        .with(fields::LTI_RATIO, 0.1)
        .with(fields::EMPLOYER_TYPE, "Private")
        .with(fields::EMI_BOUNCES, 0_i64)
        .with(fields::PREVIOUS_NPA, false)
        .with(fields::CIBIL_SCORE, 750_i64)
}

/// Profile sitting inside every neutral band except income verification,
/// which always reports a driver.
pub(super) fn neutral_applicant() -> ProfileRecord {
    ProfileRecord::new()
        .with(fields::RESIDENT_STATUS, "NRI")
        .with(fields::GEO_RISK, "Medium")
        .with(fields::DECLARED_INCOME, 400_000_i64)
        .with(fields::EXISTING_EMI, 15_000_i64)
        .with(fields::LTI_RATIO, 0.45)
        .with(fields::EMPLOYER_TYPE, "MNC")
        .with(fields::CIBIL_SCORE, 700_i64)
}

/// Defaulted borrower whose penalties overshoot the score floor.
pub(super) fn distressed_applicant() -> ProfileRecord {
    ProfileRecord::new()
        .with(fields::RESIDENT_STATUS, "Indian")
        .with(fields::GEO_RISK, "High")
        .with(fields::DECLARED_INCOME, 600_000_i64)
        .with(fields::EXISTING_EMI, 10_000_i64)
        .with(fields::LTI_RATIO, 0.2)
        .with(fields::EMPLOYER_TYPE, "Unemployed")
        .with(fields::EMI_BOUNCES, 4_i64)
        .with(fields::PREVIOUS_NPA, true)
        .with(fields::CIBIL_SCORE, 580_i64)
}

pub(super) fn router() -> axum::Router {
    assessment_router(AssessmentState::new(engine(), TEST_SEED))
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("valid request")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
