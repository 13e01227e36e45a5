//! Reading practice: passage, questions and scored attempts.

use askama::Template;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
  Form,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::{backend_failure, error_page, NavContext, TestLink};
use crate::api;
use crate::auth::AuthContext;
use crate::config;
use crate::domain::{QuestionInput, ReadingAttempt, ReadingQuestion, ReadingResult, ReadingTest, ANSWER_SEPARATOR};
use crate::filters;
use crate::state::AppState;

/// Answer inputs are named `q_<question id>`
const ANSWER_PREFIX: &str = "q_";

#[derive(Template)]
#[template(path = "practice/reading.html")]
pub struct ReadingTemplate {
  pub nav: NavContext,
  pub tests: Vec<TestLink>,
  pub test: Option<ReadingView>,
  pub result: Option<ReadingResult>,
  pub notice: Option<String>,
  pub error: Option<String>,
}

pub struct ReadingView {
  pub id: String,
  pub title: String,
  pub passage: String,
  pub difficulty: String,
  pub timer_minutes: u32,
  /// Unix seconds when the page was rendered; sent back with the answers
  pub started_at: i64,
  pub questions: Vec<QuestionView>,
}

pub struct OptionView {
  pub value: String,
  pub checked: bool,
}

pub struct QuestionView {
  pub field: String,
  pub kind: &'static str,
  pub question_type: String,
  pub prompt: String,
  pub instructions: Option<String>,
  pub options: Vec<OptionView>,
  /// Current values of the text inputs, one per blank
  pub values: Vec<String>,
}

impl QuestionView {
  fn build(question: &ReadingQuestion, answers: &HashMap<String, Vec<String>>) -> Self {
    let field = format!("{}{}", ANSWER_PREFIX, question.question_id);
    let given = answers.get(&question.question_id).cloned().unwrap_or_default();
    let input = question.input();
    let kind = match input {
      QuestionInput::Checkboxes => "checkboxes",
      QuestionInput::Radio => "radio",
      QuestionInput::Blanks(_) => "blanks",
      QuestionInput::Text => "text",
    };
    let options = question
      .options
      .iter()
      .flatten()
      .map(|value| OptionView {
        checked: given.contains(value),
        value: value.clone(),
      })
      .collect();
    let values = match input {
      QuestionInput::Blanks(count) => (0..count).map(|i| given.get(i).cloned().unwrap_or_default()).collect(),
      QuestionInput::Text => vec![given.first().cloned().unwrap_or_default()],
      _ => Vec::new(),
    };

    Self {
      field,
      kind,
      question_type: question.question_type.clone(),
      prompt: question.prompt.clone(),
      instructions: question.instructions().map(str::to_string),
      options,
      values,
    }
  }
}

impl ReadingView {
  fn build(test: &ReadingTest, answers: &HashMap<String, Vec<String>>) -> Self {
    Self {
      id: test.id.clone(),
      title: test.title.clone(),
      passage: test.passage.clone(),
      difficulty: test.difficulty.clone(),
      timer_minutes: test.timer_minutes,
      started_at: Utc::now().timestamp(),
      questions: test.questions.iter().map(|q| QuestionView::build(q, answers)).collect(),
    }
  }
}

#[derive(Deserialize, Default)]
pub struct ReadingQuery {
  pub test: Option<String>,
  pub saved: Option<String>,
  pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct HighlightForm {
  #[serde(default)]
  pub text: String,
}

#[derive(Deserialize)]
pub struct ReadingNoteForm {
  #[serde(default)]
  pub content: String,
}

/// Group submitted answer fields by question. Empty inputs are dropped.
fn submitted_answers(fields: &[(String, String)]) -> HashMap<String, Vec<String>> {
  let mut answers: HashMap<String, Vec<String>> = HashMap::new();
  for (name, value) in fields {
    let Some(question_id) = name.strip_prefix(ANSWER_PREFIX) else {
      continue;
    };
    let value = value.trim();
    if !value.is_empty() {
      answers.entry(question_id.to_string()).or_default().push(value.to_string());
    }
  }
  answers
}

/// Answers as the scorer expects them: one string per question, parts joined
fn joined_answers(answers: &HashMap<String, Vec<String>>) -> BTreeMap<String, String> {
  answers
    .iter()
    .map(|(id, values)| (id.clone(), values.join(ANSWER_SEPARATOR)))
    .collect()
}

/// Seconds since the page was rendered. Falls back to the full timer when the
/// start time is missing or unusable.
fn time_spent(fields: &[(String, String)], test: &ReadingTest, now: i64) -> u64 {
  let started_at = fields
    .iter()
    .find(|(name, _)| name == "started_at")
    .and_then(|(_, value)| value.parse::<i64>().ok());
  match started_at {
    Some(start) if start <= now => ((now - start) as u64).min(config::MAX_READING_SECONDS),
    _ => u64::from(test.timer_minutes) * 60,
  }
}

fn links(tests: &[ReadingTest], current: &str) -> Vec<TestLink> {
  tests
    .iter()
    .map(|t| TestLink::new(reading_url(&t.id), &t.title, t.id == current))
    .collect()
}

fn reading_url(test_id: &str) -> String {
  format!("/reading?test={}", urlencoding::encode(test_id))
}

/// GET /reading - Passage and questions of one reading test
pub async fn reading_page(
  State(state): State<AppState>,
  auth: AuthContext,
  Query(query): Query<ReadingQuery>,
) -> Response {
  let tests = match api::reading::fetch_tests(&auth.api(&state)).await {
    Ok(tests) => tests,
    Err(e) => return backend_failure(&state, &auth, "Failed to load reading tests", e),
  };

  let test = match query.test.as_deref() {
    Some(id) => tests.iter().find(|t| t.id == id),
    None => tests.first(),
  };
  if query.test.is_some() && test.is_none() {
    return error_page(
      NavContext::from_auth(&auth),
      StatusCode::NOT_FOUND,
      "Reading test not found",
      "This reading test is no longer available.",
    );
  }

  let notice = query.saved.as_deref().map(|saved| match saved {
    "highlight" => "Highlight added to your flashcards".to_string(),
    _ => "Note saved".to_string(),
  });
  let error = query.error.as_deref().map(|_| {
    format!(
      "Select at least {} characters of the passage to save a highlight",
      config::MIN_HIGHLIGHT_CHARS
    )
  });

  let template = ReadingTemplate {
    nav: NavContext::from_auth(&auth),
    tests: links(&tests, test.map_or("", |t| t.id.as_str())),
    test: test.map(|t| ReadingView::build(t, &HashMap::new())),
    result: None,
    notice,
    error,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// POST /reading/{test_id}/attempt - Score the answers and show the result
pub async fn submit_reading(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(test_id): Path<String>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Response {
  let api = auth.api(&state);
  let tests = match api::reading::fetch_tests(&api).await {
    Ok(tests) => tests,
    Err(e) => return backend_failure(&state, &auth, "Failed to load reading tests", e),
  };
  let Some(test) = tests.iter().find(|t| t.id == test_id) else {
    return error_page(
      NavContext::from_auth(&auth),
      StatusCode::NOT_FOUND,
      "Reading test not found",
      "This reading test is no longer available.",
    );
  };

  let answers = submitted_answers(&fields);
  let attempt = ReadingAttempt {
    test_id: test.id.clone(),
    time_spent_seconds: time_spent(&fields, test, Utc::now().timestamp()),
    answers: joined_answers(&answers),
  };

  let (result, error) = match api::reading::submit_attempt(&api, &attempt).await {
    Ok(result) => {
      tracing::info!(
        "Reading attempt on {} scored {}% (+{} XP)",
        test.id,
        result.percentage,
        result.awarded_xp
      );
      (Some(result), None)
    }
    Err(api::ApiError::Unauthorized) => {
      return backend_failure(&state, &auth, "Failed to submit answers", api::ApiError::Unauthorized);
    }
    Err(e) => {
      tracing::warn!("Failed to submit reading attempt: {}", e);
      (None, Some(e.user_message().to_string()))
    }
  };

  let template = ReadingTemplate {
    nav: NavContext::from_auth(&auth),
    tests: links(&tests, &test.id),
    test: Some(ReadingView::build(test, &answers)),
    result,
    notice: None,
    error,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// POST /reading/{test_id}/highlight - Turn a passage phrase into a flashcard
pub async fn save_highlight(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(test_id): Path<String>,
  Form(form): Form<HighlightForm>,
) -> Response {
  let text = form.text.trim();
  if text.chars().count() < config::MIN_HIGHLIGHT_CHARS {
    return Redirect::to(&format!("{}&error=highlight", reading_url(&test_id))).into_response();
  }

  match api::reading::save_highlight(&auth.api(&state), &test_id, text).await {
    Ok(()) => Redirect::to(&format!("{}&saved=highlight", reading_url(&test_id))).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to save highlight", e),
  }
}

/// POST /reading/{test_id}/notes - Attach a note to the passage
pub async fn save_reading_note(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(test_id): Path<String>,
  Form(form): Form<ReadingNoteForm>,
) -> Response {
  let content = form.content.trim();
  if content.is_empty() {
    return Redirect::to(&reading_url(&test_id)).into_response();
  }

  match api::reading::save_note(&auth.api(&state), &test_id, content).await {
    Ok(()) => Redirect::to(&format!("{}&saved=note", reading_url(&test_id))).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to save note", e),
  }
}
