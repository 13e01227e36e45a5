use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{MockResult, MockSubmission, MockTest};

pub async fn fetch_tests(api: &Authenticated<'_>) -> Result<Vec<MockTest>, ApiError> {
    api.json(&ApiRequest::get("/mock-tests")).await
}

pub async fn submit(api: &Authenticated<'_>, submission: &MockSubmission) -> Result<MockResult, ApiError> {
    api.json(&ApiRequest::post("/mock-tests/submit", submission)?).await
}
