use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{DictationAttempt, DictationResult, ListeningTest};

pub async fn fetch_tests(api: &Authenticated<'_>) -> Result<Vec<ListeningTest>, ApiError> {
    api.json(&ApiRequest::get("/listening/tests")).await
}

pub async fn submit_dictation(
    api: &Authenticated<'_>,
    attempt: &DictationAttempt,
) -> Result<DictationResult, ApiError> {
    api.json(&ApiRequest::post("/listening/dictation", attempt)?).await
}
