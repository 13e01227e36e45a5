//! Study session handlers: starting sessions, rendering drills and drill actions.

mod actions;
mod pages;
mod templates;

pub use actions::{choose, continue_drill, grade, reveal, skip, study_tts, submit_answer};
pub use pages::{start_deck_study, start_public_study, study_page};
pub use templates::{
  AnswerForm, ChoiceForm, CompleteTemplate, GradeForm, StudyTemplate, StudyView,
};

use axum::{
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};

use super::{error_page, NavContext};

fn study_url(session_id: &str) -> String {
  format!("/study/{}", session_id)
}

fn back_to_study(session_id: &str) -> Response {
  Redirect::to(&study_url(session_id)).into_response()
}

fn session_missing(nav: NavContext) -> Response {
  error_page(
    nav,
    StatusCode::NOT_FOUND,
    "Study session not found",
    "This study session has expired. Start a new one from your deck.",
  )
}
