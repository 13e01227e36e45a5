//! Starting study sessions and rendering the current drill.

use askama::Template;
use axum::{
  extract::{Path, State},
  response::{Html, IntoResponse, Redirect, Response},
};

use super::templates::{CompleteTemplate, StudyTemplate, StudyView};
use super::{session_missing, study_url};
use crate::api::{self, LogOnError};
use crate::auth::AuthContext;
use crate::domain::{Flashcard, Word};
use crate::handlers::{backend_failure, NavContext};
use crate::state::AppState;
use crate::study::StudySession;

enum StudyPage {
  Drill(StudyView),
  Complete { total: usize, graded: usize },
}

fn start_session(
  state: &AppState,
  auth: &AuthContext,
  words: Vec<Word>,
  flashcards: &[Flashcard],
  empty_redirect: &str,
) -> Response {
  match StudySession::new(words, flashcards) {
    Ok(session) => {
      let len = session.len();
      let session_id = state.sessions.insert(&auth.session_id, session);
      tracing::info!("Started study session {} with {} words", session_id, len);
      Redirect::to(&study_url(&session_id)).into_response()
    }
    Err(e) => {
      tracing::debug!("Not starting study session: {}", e);
      Redirect::to(empty_redirect).into_response()
    }
  }
}

/// POST /decks/{deck_id}/study - Study every word of a deck
pub async fn start_deck_study(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(deck_id): Path<String>,
) -> Response {
  let api = auth.api(&state);

  let words = match api::vocabulary::fetch_deck_words(&api, &deck_id).await {
    Ok(words) => words,
    Err(e) => return backend_failure(&state, &auth, "Failed to load deck", e),
  };
  // Without flashcards the session still runs, it just sends no ratings
  let flashcards = api::vocabulary::fetch_deck_flashcards(&api, &deck_id)
    .await
    .log_warn_default("Failed to load flashcards");

  start_session(
    &state,
    &auth,
    words,
    &flashcards,
    &format!("/decks/{}?error=empty", deck_id),
  )
}

/// POST /public/{token}/study - Study a shared deck (no ratings are sent)
pub async fn start_public_study(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(token): Path<String>,
) -> Response {
  let public = match api::vocabulary::fetch_public_deck(&state.api, &token).await {
    Ok(public) => public,
    Err(e) => return backend_failure(&state, &auth, "Failed to load deck", e),
  };

  start_session(&state, &auth, public.words, &[], &format!("/public/{}", token))
}

/// GET /study/{session_id} - Current drill, or the summary once finished
pub async fn study_page(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(session_id): Path<String>,
) -> Response {
  let nav = NavContext::from_auth(&auth);
  let notices = state.sessions.take_notices(&session_id, &auth.session_id);

  let page = state
    .sessions
    .with_session(&session_id, &auth.session_id, |session| {
      if session.is_finished() {
        StudyPage::Complete {
          total: session.len(),
          graded: session.graded_count(),
        }
      } else {
        StudyPage::Drill(StudyView::build(&session_id, session))
      }
    });

  match page {
    None => session_missing(nav),
    Some(StudyPage::Drill(mut view)) => {
      view.notices = notices;
      let template = StudyTemplate { nav, view };
      Html(template.render().unwrap_or_default()).into_response()
    }
    Some(StudyPage::Complete { total, graded }) => {
      let template = CompleteTemplate {
        nav,
        total,
        graded,
        notices,
      };
      Html(template.render().unwrap_or_default()).into_response()
    }
  }
}
