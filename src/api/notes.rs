use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{NoteDocument, NoteSave};

pub async fn fetch_notes(api: &Authenticated<'_>) -> Result<Vec<NoteDocument>, ApiError> {
    api.json(&ApiRequest::get("/notes")).await
}

pub async fn save_note(api: &Authenticated<'_>, note: &NoteSave) -> Result<(), ApiError> {
    api.send_empty(&ApiRequest::post("/notes", note)?).await
}
