//! Reading passages, scored attempts and passage highlights.

use serde::Serialize;

use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{ReadingAttempt, ReadingResult, ReadingTest};

#[derive(Serialize)]
struct HighlightPayload<'a> {
    test_id: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct ReadingNotePayload<'a> {
    test_id: &'a str,
    block_type: &'a str,
    block_content: &'a str,
}

pub async fn fetch_tests(api: &Authenticated<'_>) -> Result<Vec<ReadingTest>, ApiError> {
    api.json(&ApiRequest::get("/reading/tests")).await
}

pub async fn submit_attempt(api: &Authenticated<'_>, attempt: &ReadingAttempt) -> Result<ReadingResult, ApiError> {
    api.json(&ApiRequest::post("/reading/attempt", attempt)?).await
}

/// Save a phrase from the passage; the backend turns it into a flashcard
pub async fn save_highlight(api: &Authenticated<'_>, test_id: &str, text: &str) -> Result<(), ApiError> {
    let request = ApiRequest::post("/reading/highlight", &HighlightPayload { test_id, text })?;
    api.send_empty(&request).await
}

pub async fn save_note(api: &Authenticated<'_>, test_id: &str, content: &str) -> Result<(), ApiError> {
    let payload = ReadingNotePayload {
        test_id,
        block_type: "text",
        block_content: content,
    };
    api.send_empty(&ApiRequest::post("/reading/notes", &payload)?).await
}
