//! Drill actions. Every action redirects back to the study page.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Form,
};

use super::templates::{AnswerForm, ChoiceForm, GradeForm};
use super::{back_to_study, session_missing};
use crate::api;
use crate::auth::{AuthContext, Credentials};
use crate::handlers::speaking::speech_response;
use crate::handlers::NavContext;
use crate::state::AppState;
use crate::study::{ReviewRequest, StudyError, StudySession, Transition};

/// Shown on the next render after the backend accepted a rating
const REVIEW_NOTICE: &str = "Rating recorded";

enum ActionError {
  Missing,
  Rejected(StudyError),
}

fn with_study<T>(
  state: &AppState,
  auth: &AuthContext,
  session_id: &str,
  f: impl FnOnce(&mut StudySession) -> Result<T, StudyError>,
) -> Result<T, ActionError> {
  match state.sessions.with_session(session_id, &auth.session_id, f) {
    None => Err(ActionError::Missing),
    Some(result) => result.map_err(ActionError::Rejected),
  }
}

fn finish<T>(auth: &AuthContext, session_id: &str, result: Result<T, ActionError>) -> Response {
  match result {
    Ok(_) => back_to_study(session_id),
    Err(ActionError::Missing) => session_missing(NavContext::from_auth(auth)),
    Err(ActionError::Rejected(e)) => {
      tracing::debug!("Study action on {} rejected: {}", session_id, e);
      back_to_study(session_id)
    }
  }
}

fn log_transition(session_id: &str, transition: Transition) {
  match transition {
    Transition::Completed => tracing::info!("Study session {} completed", session_id),
    Transition::Item(index) => tracing::debug!("Study session {} moved to word {}", session_id, index + 1),
    Transition::Mode(mode) => tracing::debug!("Study session {} moved to {}", session_id, mode.as_str()),
  }
}

/// Send a rating in the background. The session has already moved on, so a
/// failure is only logged.
fn spawn_review(state: AppState, credentials: Credentials, session_id: String, review: ReviewRequest) {
  tokio::spawn(async move {
    let api = state.api.authenticated(&credentials);
    match api::vocabulary::submit_review(&api, &review).await {
      Ok(()) => {
        tracing::debug!("Recorded grade {} for card {}", review.grade.value(), review.card_id);
        if !state.sessions.push_notice(&session_id, REVIEW_NOTICE) {
          tracing::debug!("Study session {} ended before the rating was recorded", session_id);
        }
      }
      Err(e) => tracing::warn!("Failed to record grade for card {}: {}", review.card_id, e),
    }
  });
}

/// POST /study/{session_id}/reveal - Flip the card or toggle the answer
pub async fn reveal(State(state): State<AppState>, auth: AuthContext, Path(session_id): Path<String>) -> Response {
  let result = with_study(&state, &auth, &session_id, |s| s.toggle_reveal());
  finish(&auth, &session_id, result)
}

/// POST /study/{session_id}/answer - Store and check a typed answer
pub async fn submit_answer(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(session_id): Path<String>,
  Form(form): Form<AnswerForm>,
) -> Response {
  let result = with_study(&state, &auth, &session_id, |s| s.submit_answer(&form.answer));
  finish(&auth, &session_id, result)
}

/// POST /study/{session_id}/choose - Pick a multiple choice option
pub async fn choose(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(session_id): Path<String>,
  Form(form): Form<ChoiceForm>,
) -> Response {
  let Some(index) = form.index() else {
    tracing::debug!("Rejected malformed choice {:?}", form.choice);
    return back_to_study(&session_id);
  };
  let result = with_study(&state, &auth, &session_id, |s| s.choose(index));
  finish(&auth, &session_id, result)
}

/// POST /study/{session_id}/grade - Rate the flashcard and move on
pub async fn grade(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(session_id): Path<String>,
  Form(form): Form<GradeForm>,
) -> Response {
  let Some(grade) = form.grade() else {
    tracing::warn!("Rejected invalid grade {:?}", form.grade);
    return back_to_study(&session_id);
  };

  let result = with_study(&state, &auth, &session_id, |s| s.handle_grade(grade));
  if let Ok(outcome) = &result {
    log_transition(&session_id, outcome.transition);
    // Session lock is released; the rating goes out without blocking the page
    if let Some(review) = outcome.review.clone() {
      spawn_review(state.clone(), auth.credentials.clone(), session_id.clone(), review);
    }
  }
  finish(&auth, &session_id, result)
}

/// POST /study/{session_id}/skip - Mark the current drill as known
pub async fn skip(State(state): State<AppState>, auth: AuthContext, Path(session_id): Path<String>) -> Response {
  let result = with_study(&state, &auth, &session_id, |s| s.handle_skip());
  if let Ok(transition) = &result {
    log_transition(&session_id, *transition);
  }
  finish(&auth, &session_id, result)
}

/// POST /study/{session_id}/continue - Complete a non-flashcard drill
pub async fn continue_drill(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(session_id): Path<String>,
) -> Response {
  let result = with_study(&state, &auth, &session_id, |s| s.handle_complete_mode());
  if let Ok(transition) = &result {
    log_transition(&session_id, *transition);
  }
  finish(&auth, &session_id, result)
}

/// GET /study/{session_id}/tts/{index} - Audio of a word of the session.
///
/// The word position is part of the URL so each headword has its own
/// cacheable address. Words after the current one are not served.
pub async fn study_tts(
  State(state): State<AppState>,
  auth: AuthContext,
  Path((session_id, index)): Path<(String, usize)>,
) -> Response {
  let text = state
    .sessions
    .with_session(&session_id, &auth.session_id, |s| {
      if index > s.index() {
        return None;
      }
      s.items().get(index).map(|item| item.word.word.clone())
    })
    .flatten();
  let Some(text) = text else {
    return StatusCode::NOT_FOUND.into_response();
  };

  speech_response(&state, &auth, &text).await
}
