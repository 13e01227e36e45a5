//! Notes workspace: free-form documents made of text blocks.

use askama::Template;
use axum::{
  extract::{Query, State},
  response::{Html, IntoResponse, Redirect, Response},
  Form,
};
use serde::Deserialize;

use super::{backend_failure, NavContext};
use crate::api;
use crate::auth::AuthContext;
use crate::domain::{NoteBlock, NoteDocument, NoteSave, DEFAULT_NOTE_TITLE};
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "practice/notes.html")]
pub struct NotesTemplate {
  pub nav: NavContext,
  pub documents: Vec<NoteDocument>,
  pub notice: Option<String>,
  pub error: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct NotesQuery {
  pub saved: Option<String>,
  pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct NoteForm {
  /// Empty for a new document
  #[serde(default)]
  pub document_id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub content: String,
}

impl NoteForm {
  fn into_save(self, documents: &[NoteDocument]) -> Option<NoteSave> {
    let content = self.content.trim();
    if content.is_empty() {
      return None;
    }
    let existing = documents.iter().find(|d| !self.document_id.is_empty() && d.id == self.document_id);
    let title = match self.title.trim() {
      "" => existing
        .map(|d| d.title.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_NOTE_TITLE.to_string()),
      title => title.to_string(),
    };
    Some(NoteSave {
      document_id: existing.map(|d| d.id.clone()),
      title,
      blocks: vec![NoteBlock::paragraph(content)],
    })
  }
}

/// GET /notes - All note documents
pub async fn notes_page(
  State(state): State<AppState>,
  auth: AuthContext,
  Query(query): Query<NotesQuery>,
) -> Response {
  let documents = match api::notes::fetch_notes(&auth.api(&state)).await {
    Ok(documents) => documents,
    Err(e) => return backend_failure(&state, &auth, "Failed to load notes", e),
  };
  let template = NotesTemplate {
    nav: NavContext::from_auth(&auth),
    documents,
    notice: query.saved.map(|_| "Note saved".to_string()),
    error: query.error.map(|_| "Write something before saving".to_string()),
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// POST /notes - Save a block into an existing or new document
pub async fn save_note(State(state): State<AppState>, auth: AuthContext, Form(form): Form<NoteForm>) -> Response {
  if form.content.trim().is_empty() {
    return Redirect::to("/notes?error=empty").into_response();
  }

  let api = auth.api(&state);
  let documents = match api::notes::fetch_notes(&api).await {
    Ok(documents) => documents,
    Err(e) => return backend_failure(&state, &auth, "Failed to load notes", e),
  };
  let Some(note) = form.into_save(&documents) else {
    return Redirect::to("/notes?error=empty").into_response();
  };

  match api::notes::save_note(&api, &note).await {
    Ok(()) => Redirect::to("/notes?saved=1").into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to save note", e),
  }
}
