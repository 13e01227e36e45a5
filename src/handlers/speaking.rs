//! Speaking practice. The learner types what they said; recording and
//! transcription are left to the browser or another tool.

use askama::Template;
use axum::{
  extract::{Query, State},
  http::{header, StatusCode},
  response::{Html, IntoResponse, Response},
  Form,
};
use serde::Deserialize;

use super::{backend_failure, NavContext};
use crate::api::{self, ApiError, LogOnError};
use crate::auth::AuthContext;
use crate::config;
use crate::domain::{format_band, SpeakingAttempt, SpeakingPrompt, SpeakingScore};
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "practice/speaking.html")]
pub struct SpeakingTemplate {
  pub nav: NavContext,
  pub prompts: Vec<PromptLink>,
  pub hints: Vec<String>,
  pub expected_text: String,
  pub spoken_text: String,
  pub audio_url: Option<String>,
  pub score: Option<ScoreView>,
  pub error: Option<String>,
}

pub struct PromptLink {
  pub index: usize,
  pub topic: String,
  pub current: bool,
}

pub struct ScoreView {
  pub accuracy: String,
  pub fluency: String,
  pub completeness: String,
  pub band: Option<String>,
  pub feedback: Option<String>,
}

impl ScoreView {
  fn build(score: &SpeakingScore) -> Self {
    let percent = |value: Option<f64>| value.map_or_else(|| "--".to_string(), |v| format!("{}%", v.round()));
    Self {
      accuracy: percent(score.accuracy()),
      fluency: percent(score.fluency()),
      completeness: percent(score.completeness()),
      band: score.band().map(format_band),
      feedback: score.feedback.clone(),
    }
  }
}

fn tts_url(text: &str) -> Option<String> {
  let text = text.trim();
  (!text.is_empty()).then(|| format!("/speaking/tts?text={}", urlencoding::encode(text)))
}

impl SpeakingTemplate {
  fn build(auth: &AuthContext, prompts: &[SpeakingPrompt], selected: Option<usize>, expected_text: String) -> Self {
    Self {
      nav: NavContext::from_auth(auth),
      prompts: prompts
        .iter()
        .enumerate()
        .map(|(index, p)| PromptLink {
          index,
          topic: p.topic.clone(),
          current: selected == Some(index),
        })
        .collect(),
      hints: selected
        .and_then(|i| prompts.get(i))
        .map(|p| p.hints.clone())
        .unwrap_or_default(),
      audio_url: tts_url(&expected_text),
      expected_text,
      spoken_text: String::new(),
      score: None,
      error: None,
    }
  }

  fn render_page(self) -> Response {
    Html(self.render().unwrap_or_default()).into_response()
  }
}

#[derive(Deserialize, Default)]
pub struct SpeakingQuery {
  pub prompt: Option<usize>,
}

#[derive(Deserialize)]
pub struct ScoreForm {
  #[serde(default)]
  pub expected_text: String,
  #[serde(default)]
  pub spoken_text: String,
}

#[derive(Deserialize)]
pub struct TtsQuery {
  #[serde(default)]
  pub text: String,
}

/// Synthesize `text` and relay the audio.
///
/// Callers must put the text, or something that identifies it, in the URL:
/// responses may be cached for an hour.
pub(crate) async fn speech_response(state: &AppState, auth: &AuthContext, text: &str) -> Response {
  match api::speaking::generate_tts(&auth.api(state), text).await {
    Ok(audio) => (
      [
        (header::CONTENT_TYPE, audio.content_type),
        (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
      ],
      audio.bytes,
    )
      .into_response(),
    Err(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED.into_response(),
    Err(e) => {
      tracing::warn!("TTS failed for {:?}: {}", text, e);
      (StatusCode::BAD_GATEWAY, e.user_message()).into_response()
    }
  }
}

/// GET /speaking - Pick a prompt and practise it
pub async fn speaking_page(
  State(state): State<AppState>,
  auth: AuthContext,
  Query(query): Query<SpeakingQuery>,
) -> Response {
  let prompts = match api::speaking::fetch_prompts(&auth.api(&state)).await {
    Ok(prompts) => prompts,
    Err(e) => return backend_failure(&state, &auth, "Failed to load speaking prompts", e),
  };

  let selected = query.prompt.unwrap_or(0);
  let selected = (selected < prompts.len()).then_some(selected);
  let expected_text = selected
    .and_then(|i| prompts.get(i))
    .map(|p| p.scenario.clone())
    .unwrap_or_default();
  SpeakingTemplate::build(&auth, &prompts, selected, expected_text).render_page()
}

/// POST /speaking/score - Score a spoken attempt against the model text
pub async fn score_speaking(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<ScoreForm>,
) -> Response {
  let api = auth.api(&state);
  // The prompt list only decorates the page
  let prompts = api::speaking::fetch_prompts(&api)
    .await
    .log_warn_default("Failed to load speaking prompts");
  let expected_text = form.expected_text.trim().to_string();
  let selected = prompts.iter().position(|p| p.scenario == expected_text);
  let mut page = SpeakingTemplate::build(&auth, &prompts, selected, expected_text.clone());
  page.spoken_text = form.spoken_text.trim().to_string();

  if expected_text.is_empty() {
    page.error = Some("Enter the model text to compare against".to_string());
    return page.render_page();
  }
  if page.spoken_text.is_empty() {
    page.error = Some("Enter what you said before scoring".to_string());
    return page.render_page();
  }

  let attempt = SpeakingAttempt {
    expected_text,
    spoken_text: page.spoken_text.clone(),
  };
  match api::speaking::score(&api, &attempt).await {
    Ok(score) => page.score = Some(ScoreView::build(&score)),
    Err(ApiError::Unauthorized) => {
      return backend_failure(&state, &auth, "Failed to score speaking", ApiError::Unauthorized);
    }
    Err(e) => {
      tracing::warn!("Failed to score speaking attempt: {}", e);
      page.error = Some(e.user_message().to_string());
    }
  }
  page.render_page()
}

/// GET /speaking/tts?text=... - Pronunciation of the model text
pub async fn speaking_tts(
  State(state): State<AppState>,
  auth: AuthContext,
  Query(query): Query<TtsQuery>,
) -> Response {
  let text = query.text.trim();
  if text.is_empty() || text.chars().count() > config::MAX_TTS_CHARS {
    return StatusCode::BAD_REQUEST.into_response();
  }
  speech_response(&state, &auth, text).await
}
