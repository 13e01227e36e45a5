//! Writing coach: generated prompts, essay assessment and saving suggested
//! vocabulary to a deck.

use askama::Template;
use axum::{
  extract::State,
  response::{Html, IntoResponse, Redirect, Response},
  Form,
};
use serde::Deserialize;

use super::{backend_failure, NavContext};
use crate::api::{self, ApiError, LogOnError};
use crate::auth::AuthContext;
use crate::domain::{
  band_gap, format_band, parse_band, Deck, EssaySubmission, ImprovedChange, LexicalSuggestion, NewWord, TaskType,
  WeakSentence, WritingFeedback,
};
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "practice/writing.html")]
pub struct WritingTemplate {
  pub nav: NavContext,
  pub task_type: &'static str,
  pub prompt: Option<PromptView>,
  pub content: String,
  pub target_band: String,
  pub feedback: Option<FeedbackView>,
  pub decks: Vec<Deck>,
  pub error: Option<String>,
}

pub struct PromptView {
  pub title: String,
  pub description: String,
}

pub struct FeedbackView {
  pub overall: String,
  pub task: String,
  pub coherence: String,
  pub lexical: String,
  pub grammar: String,
  pub summary: String,
  /// Shortfall against the target band, e.g. `1.0`
  pub gap: Option<String>,
  pub improved_version: Option<String>,
  pub changes: Vec<ImprovedChange>,
  pub suggestions: Vec<String>,
  pub grammar_errors: Vec<String>,
  pub lexical_suggestions: Vec<LexicalSuggestion>,
  pub weak_sentences: Vec<WeakSentence>,
}

impl FeedbackView {
  fn build(feedback: WritingFeedback, target: Option<f64>) -> Self {
    let changes = feedback.ordered_changes().into_iter().cloned().collect();
    Self {
      overall: format_band(feedback.overall_band),
      task: format_band(feedback.task),
      coherence: format_band(feedback.coherence),
      lexical: format_band(feedback.lexical),
      grammar: format_band(feedback.grammar),
      gap: target
        .and_then(|t| band_gap(feedback.overall_band, t))
        .map(format_band),
      changes,
      summary: feedback.feedback,
      improved_version: feedback.improved_version,
      suggestions: feedback.suggestions,
      grammar_errors: feedback.grammar_errors,
      lexical_suggestions: feedback.lexical_suggestions,
      weak_sentences: feedback.weak_sentences,
    }
  }
}

impl WritingTemplate {
  fn empty(auth: &AuthContext, task_type: TaskType) -> Self {
    Self {
      nav: NavContext::from_auth(auth),
      task_type: task_type.as_str(),
      prompt: None,
      content: String::new(),
      target_band: String::new(),
      feedback: None,
      decks: Vec::new(),
      error: None,
    }
  }

  fn render_page(self) -> Response {
    Html(self.render().unwrap_or_default()).into_response()
  }
}

#[derive(Deserialize)]
pub struct PromptForm {
  #[serde(default)]
  pub task_type: String,
}

#[derive(Deserialize)]
pub struct EssayForm {
  #[serde(default)]
  pub task_type: String,
  #[serde(default)]
  pub prompt_title: String,
  #[serde(default)]
  pub prompt_content: String,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub target_band: String,
}

#[derive(Deserialize)]
pub struct SaveWordForm {
  pub deck_id: String,
  pub word: String,
  #[serde(default)]
  pub definition: String,
}

/// GET /writing - Pick a task type
pub async fn writing_page(auth: AuthContext) -> Response {
  WritingTemplate::empty(&auth, TaskType::default()).render_page()
}

/// POST /writing/prompt - Generate a prompt to write against
pub async fn generate_prompt(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<PromptForm>,
) -> Response {
  let task_type = TaskType::from_str(&form.task_type).unwrap_or_default();
  let mut page = WritingTemplate::empty(&auth, task_type);

  match api::writing::generate_prompt(&auth.api(&state), task_type).await {
    Ok(prompt) => {
      tracing::info!("Generated {} writing prompt {}", task_type.as_str(), prompt.id);
      page.prompt = Some(PromptView {
        title: prompt.title,
        description: prompt.description,
      });
    }
    Err(ApiError::Unauthorized) => {
      return backend_failure(&state, &auth, "Failed to generate prompt", ApiError::Unauthorized);
    }
    Err(e) => {
      tracing::warn!("Failed to generate writing prompt: {}", e);
      page.error = Some(e.detail().unwrap_or_else(|| e.user_message().to_string()));
    }
  }
  page.render_page()
}

/// POST /writing/submit - Assess an essay
pub async fn submit_essay(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<EssayForm>,
) -> Response {
  let task_type = TaskType::from_str(&form.task_type).unwrap_or_default();
  let mut page = WritingTemplate::empty(&auth, task_type);
  page.prompt = Some(PromptView {
    title: form.prompt_title.trim().to_string(),
    description: form.prompt_content.trim().to_string(),
  });
  page.content = form.content.clone();
  page.target_band = form.target_band.trim().to_string();

  if form.prompt_content.trim().is_empty() {
    page.prompt = None;
    page.error = Some("Generate a prompt before submitting".to_string());
    return page.render_page();
  }
  if form.content.trim().is_empty() {
    page.error = Some("Write your essay before submitting".to_string());
    return page.render_page();
  }
  let target_band = if page.target_band.is_empty() {
    None
  } else {
    match parse_band(&page.target_band) {
      Some(band) => Some(band),
      None => {
        page.error = Some("Target band must be between 0 and 9 in steps of 0.5".to_string());
        return page.render_page();
      }
    }
  };

  let api = auth.api(&state);
  let essay = EssaySubmission {
    task_type,
    content: form.content.trim().to_string(),
    prompt_content: form.prompt_content.trim().to_string(),
    target_band,
  };
  match api::writing::submit_essay(&api, &essay).await {
    Ok(feedback) => {
      tracing::info!("Essay assessed at band {}", format_band(feedback.overall_band));
      page.feedback = Some(FeedbackView::build(feedback, target_band));
      page.decks = api::vocabulary::fetch_decks(&api)
        .await
        .log_warn_default("Failed to load decks for saving words");
    }
    Err(ApiError::Unauthorized) => {
      return backend_failure(&state, &auth, "Failed to assess essay", ApiError::Unauthorized);
    }
    Err(e) => {
      tracing::warn!("Failed to assess essay: {}", e);
      page.error = Some(e.detail().unwrap_or_else(|| e.user_message().to_string()));
    }
  }
  page.render_page()
}

/// POST /writing/save-word - Add a suggested word to one of the user's decks
pub async fn save_suggested_word(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<SaveWordForm>,
) -> Response {
  let word = form.word.trim();
  if form.deck_id.is_empty() || word.is_empty() {
    return Redirect::to("/writing").into_response();
  }
  let definition = match form.definition.trim() {
    "" => "Better alternative vocabulary word",
    definition => definition,
  };
  let new_word = NewWord {
    word: word.to_string(),
    definition: definition.to_string(),
    tags: vec!["writing".to_string()],
    ..NewWord::default()
  };

  match api::vocabulary::add_deck_word(&auth.api(&state), &form.deck_id, &new_word).await {
    Ok(_) => Redirect::to(&format!("/decks/{}", form.deck_id)).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to save word", e),
  }
}
