pub mod decks;
pub mod listening;
pub mod notes;
pub mod reading;
pub mod speaking;
pub mod study;
pub mod writing;

use askama::Template;
use axum::{
  extract::State,
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};

use crate::api::{self, ApiError, LogOnError};
use crate::auth::AuthContext;
use crate::domain::{DashboardSummary, Deck, LeaderboardEntry};
use crate::filters;
use crate::state::AppState;

/// Navigation bar data shared by every page
#[derive(Debug, Clone, Default)]
pub struct NavContext {
  pub logged_in: bool,
  pub user_name: String,
}

impl NavContext {
  pub fn anonymous() -> Self {
    Self::default()
  }

  pub fn from_auth(auth: &AuthContext) -> Self {
    Self {
      logged_in: true,
      user_name: auth.display_name().unwrap_or_else(|| "Account".to_string()),
    }
  }

  pub fn from_optional(auth: Option<&AuthContext>) -> Self {
    auth.map(Self::from_auth).unwrap_or_default()
  }
}

/// Entry of a test picker
#[derive(Debug, Clone)]
pub struct TestLink {
  pub href: String,
  pub title: String,
  pub current: bool,
}

impl TestLink {
  pub fn new(href: String, title: &str, current: bool) -> Self {
    Self {
      href,
      title: title.to_string(),
      current,
    }
  }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
  pub nav: NavContext,
  pub title: String,
  pub message: String,
}

pub(crate) fn error_page(nav: NavContext, status: StatusCode, title: &str, message: &str) -> Response {
  let template = ErrorTemplate {
    nav,
    title: title.to_string(),
    message: message.to_string(),
  };
  (status, Html(template.render().unwrap_or_default())).into_response()
}

/// Response for a backend call the page cannot do without.
///
/// Rejected credentials end the login; everything else renders an error page.
pub(crate) fn backend_failure(state: &AppState, auth: &AuthContext, context: &str, err: ApiError) -> Response {
  if matches!(err, ApiError::Unauthorized) {
    tracing::info!("{}: credentials rejected, logging out", context);
    state.tokens.remove(&auth.session_id);
    return Redirect::to("/login").into_response();
  }

  tracing::warn!("{}: {}", context, err);
  let status = if err.is_not_found() {
    StatusCode::NOT_FOUND
  } else {
    StatusCode::BAD_GATEWAY
  };
  error_page(NavContext::from_auth(auth), status, context, err.user_message())
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub nav: NavContext,
  pub summary: DashboardSummary,
  pub total_minutes: u32,
  pub decks: Vec<Deck>,
  pub deck_error: Option<String>,
  pub leaderboard: Vec<LeaderboardEntry>,
}

pub async fn index(State(state): State<AppState>, auth: AuthContext) -> Response {
  let api = auth.api(&state);

  let (decks, deck_error) = match api::vocabulary::fetch_decks(&api).await {
    Ok(decks) => (decks, None),
    Err(ApiError::Unauthorized) => {
      return backend_failure(&state, &auth, "Failed to load decks", ApiError::Unauthorized);
    }
    Err(e) => {
      tracing::warn!("Failed to load decks: {}", e);
      (Vec::new(), Some(e.user_message().to_string()))
    }
  };

  // Dashboard is secondary; an empty summary is fine
  let summary = api::dashboard::fetch_dashboard(&api)
    .await
    .log_warn_default("Failed to load dashboard");
  let leaderboard = api::dashboard::fetch_leaderboard(&api)
    .await
    .log_warn_default("Failed to load leaderboard");

  let template = IndexTemplate {
    nav: NavContext::from_auth(&auth),
    total_minutes: summary.total_minutes(),
    summary,
    decks,
    deck_error,
    leaderboard,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

pub use decks::{
  add_member, add_word, bulk_import, create_deck, deck_page, delete_word, parse_bulk_words, public_deck_page,
  share_deck, update_word,
};
pub use listening::{listening_page, submit_dictation};
pub use mock_tests::{mock_tests_page, submit_mock_test};
pub use notes::{notes_page, save_note};
pub use reading::{reading_page, save_highlight, save_reading_note, submit_reading};
pub use speaking::{score_speaking, speaking_page, speaking_tts};
pub use study::{
  choose, continue_drill, grade, reveal, skip, start_deck_study, start_public_study, study_page, study_tts,
  submit_answer,
};
pub use writing::{generate_prompt, save_suggested_word, submit_essay, writing_page};

#[cfg(test)]
mod tests {
  use crate::testing::{logged_in_server, test_server};
  use axum::http::StatusCode;

  #[tokio::test]
  async fn test_index_requires_login() {
    let (server, mock) = test_server().await;
    let response = server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
    assert!(mock.requests().is_empty());
  }

  #[tokio::test]
  async fn test_index_shows_decks_and_dashboard() {
    let (server, _mock) = logged_in_server().await;
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text_contains("Academic Words");
    response.assert_text_contains("Lan Tran");
    response.assert_text_contains("Review 10 words");
    response.assert_text_contains("#1 Minh Pham");
    response.assert_text_contains("900 XP");
  }

  #[tokio::test]
  async fn test_nav_links_every_practice_area() {
    let (server, _mock) = logged_in_server().await;
    let text = server.get("/").await.text();
    for href in ["/reading", "/listening", "/writing", "/speaking", "/mock-tests", "/notes"] {
      assert!(text.contains(&format!(r#"href="{}""#, href)), "missing {}", href);
    }

    let (server, _mock) = test_server().await;
    let login = server.get("/login").await;
    login.assert_text_contains(r#"href="/register""#);
    assert!(!login.text().contains(r#"href="/reading""#));
  }

  #[tokio::test]
  async fn test_practice_pages_require_login() {
    let (server, mock) = test_server().await;
    for path in ["/reading", "/listening", "/writing", "/speaking", "/mock-tests", "/notes"] {
      let response = server.get(path).await;
      response.assert_status(StatusCode::SEE_OTHER);
      assert_eq!(response.header("location"), "/login");
    }
    assert!(mock.requests().is_empty());
  }

  #[tokio::test]
  async fn test_expired_token_is_refreshed_transparently() {
    let (server, mock) = logged_in_server().await;
    mock.expire_tokens();

    server.get("/").await.assert_status_ok();
    assert_eq!(mock.count_path("/auth/refresh"), 1);
    assert_eq!(mock.count_path("/vocabulary/decks"), 2);
    // New token serves the dashboard call without another refresh
    assert_eq!(mock.count_path("/dashboard"), 1);
  }

  #[tokio::test]
  async fn test_failed_refresh_logs_out() {
    let (server, mock) = logged_in_server().await;
    mock.expire_tokens();
    mock.set_refresh_enabled(false);

    let response = server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");

    // Tokens were forgotten, so no further backend calls are made
    mock.clear_requests();
    server.get("/").await.assert_status(StatusCode::SEE_OTHER);
    assert!(mock.requests().is_empty());
  }
}
