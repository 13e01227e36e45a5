//! Listening dictation: hear one sentence, type it, get an accuracy score.

use askama::Template;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
  Form,
};
use serde::Deserialize;

use super::{backend_failure, error_page, NavContext, TestLink};
use crate::api::{self, ApiError};
use crate::auth::AuthContext;
use crate::domain::{DictationAttempt, DictationResult, ListeningTest};
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "practice/listening.html")]
pub struct ListeningTemplate {
  pub nav: NavContext,
  pub tests: Vec<TestLink>,
  pub test: Option<ListeningView>,
  pub error: Option<String>,
}

pub struct ListeningView {
  pub id: String,
  pub title: String,
  pub audio_url: String,
  pub sentences: Vec<SentenceView>,
}

pub struct SentenceView {
  pub sentence_id: String,
  pub hint: String,
  pub clip_url: String,
  pub attempt: String,
  /// Filled after a scored attempt, together with the sentence text
  pub result: Option<DictationResult>,
  pub text: Option<String>,
}

impl ListeningView {
  fn build(test: &ListeningTest) -> Self {
    Self {
      id: test.id.clone(),
      title: test.title.clone(),
      audio_url: test.audio_url.clone(),
      sentences: test
        .sentences
        .iter()
        .map(|s| SentenceView {
          sentence_id: s.sentence_id.clone(),
          hint: s.hint(),
          clip_url: s.clip_url(&test.audio_url),
          attempt: String::new(),
          result: None,
          text: None,
        })
        .collect(),
    }
  }
}

#[derive(Deserialize, Default)]
pub struct ListeningQuery {
  pub test: Option<String>,
}

#[derive(Deserialize)]
pub struct DictationForm {
  #[serde(default)]
  pub sentence_id: String,
  #[serde(default)]
  pub attempt: String,
}

fn links(tests: &[ListeningTest], current: &str) -> Vec<TestLink> {
  tests
    .iter()
    .map(|t| {
      let href = format!("/listening?test={}", urlencoding::encode(&t.id));
      TestLink::new(href, &t.title, t.id == current)
    })
    .collect()
}

fn render(auth: &AuthContext, tests: &[ListeningTest], test: Option<ListeningView>, error: Option<String>) -> Response {
  let template = ListeningTemplate {
    nav: NavContext::from_auth(auth),
    tests: links(tests, test.as_ref().map_or("", |t| t.id.as_str())),
    test,
    error,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

fn test_missing(auth: &AuthContext) -> Response {
  error_page(
    NavContext::from_auth(auth),
    StatusCode::NOT_FOUND,
    "Listening test not found",
    "This listening test is no longer available.",
  )
}

/// GET /listening - Sentences of one recording with their hints
pub async fn listening_page(
  State(state): State<AppState>,
  auth: AuthContext,
  Query(query): Query<ListeningQuery>,
) -> Response {
  let tests = match api::listening::fetch_tests(&auth.api(&state)).await {
    Ok(tests) => tests,
    Err(e) => return backend_failure(&state, &auth, "Failed to load listening tests", e),
  };

  let test = match query.test.as_deref() {
    Some(id) => match tests.iter().find(|t| t.id == id) {
      Some(test) => Some(test),
      None => return test_missing(&auth),
    },
    None => tests.first(),
  };
  render(&auth, &tests, test.map(ListeningView::build), None)
}

/// POST /listening/{test_id}/dictation - Score a typed sentence
pub async fn submit_dictation(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(test_id): Path<String>,
  Form(form): Form<DictationForm>,
) -> Response {
  let api = auth.api(&state);
  let tests = match api::listening::fetch_tests(&api).await {
    Ok(tests) => tests,
    Err(e) => return backend_failure(&state, &auth, "Failed to load listening tests", e),
  };
  let Some(test) = tests.iter().find(|t| t.id == test_id) else {
    return test_missing(&auth);
  };
  let Some(sentence) = test.sentence(&form.sentence_id) else {
    return test_missing(&auth);
  };

  let mut view = ListeningView::build(test);
  let attempt = form.attempt.trim();
  if attempt.is_empty() {
    return render(&auth, &tests, Some(view), Some("Type what you heard first".to_string()));
  }

  let request = DictationAttempt {
    test_id: test.id.clone(),
    sentence_id: sentence.sentence_id.clone(),
    attempt: attempt.to_string(),
  };
  let (result, error) = match api::listening::submit_dictation(&api, &request).await {
    Ok(result) => {
      tracing::debug!("Dictation {}/{} scored {}%", test.id, sentence.sentence_id, result.percent());
      (Some(result), None)
    }
    Err(ApiError::Unauthorized) => {
      return backend_failure(&state, &auth, "Failed to score dictation", ApiError::Unauthorized);
    }
    Err(e) => {
      tracing::warn!("Failed to score dictation: {}", e);
      (None, Some(e.user_message().to_string()))
    }
  };

  if let Some(entry) = view.sentences.iter_mut().find(|s| s.sentence_id == sentence.sentence_id) {
    entry.attempt = attempt.to_string();
    if result.is_some() {
      entry.text = Some(sentence.text.clone());
    }
    entry.result = result;
  }
  render(&auth, &tests, Some(view), error)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::logged_in_server;

  #[tokio::test]
  async fn test_page_shows_hints_not_sentences() {
    let (server, _mock) = logged_in_server().await;
    let page = server.get("/listening").await;
    page.assert_status_ok();
    page.assert_text_contains("Booking a Bus Tour");
    page.assert_text_contains("5 words · T · t · l · a · n");
    page.assert_text_contains("https://cdn.example.com/bus-tour.mp3#t=2.5,4.75");
    assert!(!page.text().contains("The tour leaves at nine"));

    server.get("/listening?test=nope").await.assert_status(StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_dictation_scores_and_reveals_sentence() {
    let (server, mock) = logged_in_server().await;
    let page = server
      .post("/listening/listening-1/dictation")
      .form(&[("sentence_id", "s1"), ("attempt", "the tour leaves at nine ")])
      .await;
    page.assert_status_ok();
    page.assert_text_contains("80%");
    page.assert_text_contains("+5 XP");
    page.assert_text_contains("The tour leaves at nine");
    // Only the scored sentence is revealed
    assert!(!page.text().contains("Bring a packed lunch"));

    let request = mock
      .requests()
      .into_iter()
      .find(|r| r.path == "/listening/dictation")
      .unwrap();
    assert_eq!(
      request.body,
      Some(serde_json::json!({
        "test_id": "listening-1",
        "sentence_id": "s1",
        "attempt": "the tour leaves at nine"
      }))
    );
  }

  #[tokio::test]
  async fn test_empty_dictation_is_not_scored() {
    let (server, mock) = logged_in_server().await;
    let page = server
      .post("/listening/listening-1/dictation")
      .form(&[("sentence_id", "s2"), ("attempt", "  ")])
      .await;
    page.assert_text_contains("Type what you heard first");
    assert_eq!(mock.count_path("/listening/dictation"), 0);

    server
      .post("/listening/listening-1/dictation")
      .form(&[("sentence_id", "s9"), ("attempt", "hello")])
      .await
      .assert_status(StatusCode::NOT_FOUND);
  }
}
