//! Deck management pages and the public deck view.

use askama::Template;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
  Form,
};
use serde::Deserialize;

use super::{backend_failure, error_page, NavContext};
use crate::api::{self, LogOnError};
use crate::auth::{AuthContext, OptionalAuth};
use crate::domain::{DeckUpdate, NewDeck, NewWord, Word};
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "deck.html")]
pub struct DeckTemplate {
  pub nav: NavContext,
  pub deck_id: String,
  pub deck_name: String,
  pub description: Option<String>,
  pub is_public: bool,
  pub share_url: Option<String>,
  pub words: Vec<Word>,
  pub notice: Option<String>,
  pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "public_deck.html")]
pub struct PublicDeckTemplate {
  pub nav: NavContext,
  pub token: String,
  pub deck_name: String,
  pub description: Option<String>,
  pub words: Vec<Word>,
}

#[derive(Deserialize, Default)]
pub struct DeckQuery {
  pub imported: Option<usize>,
  pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct NewDeckForm {
  pub name: String,
  #[serde(default)]
  pub description: String,
  /// Checkbox; present when ticked
  pub is_public: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct WordForm {
  pub word: String,
  pub definition: String,
  #[serde(default)]
  pub phonetic: String,
  #[serde(default)]
  pub part_of_speech: String,
  #[serde(default)]
  pub example: String,
  #[serde(default)]
  pub notes: String,
  #[serde(default)]
  pub explanation: String,
  /// Comma separated
  #[serde(default)]
  pub tags: String,
}

#[derive(Deserialize)]
pub struct BulkForm {
  pub text: String,
}

#[derive(Deserialize)]
pub struct ShareForm {
  pub is_public: Option<String>,
}

#[derive(Deserialize)]
pub struct MemberForm {
  pub email: String,
}

fn non_empty(value: &str) -> Option<String> {
  let value = value.trim();
  (!value.is_empty()).then(|| value.to_string())
}

fn split_tags(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}

impl WordForm {
  fn into_new_word(self) -> Option<NewWord> {
    let word = non_empty(&self.word)?;
    let definition = non_empty(&self.definition)?;
    Some(NewWord {
      word,
      definition,
      phonetic: non_empty(&self.phonetic),
      part_of_speech: non_empty(&self.part_of_speech),
      notes: non_empty(&self.notes),
      explanation: non_empty(&self.explanation),
      example: non_empty(&self.example),
      tags: split_tags(&self.tags),
    })
  }
}

/// Parse the bulk import textarea, one word per line.
///
/// Accepted line formats:
/// - `word | definition | phonetic | part of speech | example | notes | explanation | tag1, tag2`
/// - `word - definition`
/// - `word: definition`
///
/// Lines without both a word and a definition are dropped.
pub fn parse_bulk_words(text: &str) -> Vec<NewWord> {
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .filter_map(parse_bulk_line)
    .collect()
}

fn parse_bulk_line(line: &str) -> Option<NewWord> {
  let (word, definition) = if line.contains('|') {
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    let field = |i: usize| parts.get(i).and_then(|p| non_empty(p));
    let new_word = NewWord {
      word: field(0)?,
      definition: field(1)?,
      phonetic: field(2),
      part_of_speech: field(3),
      example: field(4),
      notes: field(5),
      explanation: field(6),
      tags: parts.get(7).map(|t| split_tags(t)).unwrap_or_default(),
    };
    return Some(new_word);
  } else if let Some((word, definition)) = line.split_once(" - ") {
    (word, definition)
  } else if let Some((word, definition)) = line.split_once(':') {
    (word, definition)
  } else {
    return None;
  };

  Some(NewWord {
    word: non_empty(word)?,
    definition: non_empty(definition)?,
    ..NewWord::default()
  })
}

/// POST /decks - Create a deck
pub async fn create_deck(State(state): State<AppState>, auth: AuthContext, Form(form): Form<NewDeckForm>) -> Response {
  let Some(name) = non_empty(&form.name) else {
    return Redirect::to("/").into_response();
  };
  let new_deck = NewDeck {
    name,
    description: non_empty(&form.description),
    is_public: form.is_public.is_some(),
  };

  match api::vocabulary::create_deck(&auth.api(&state), &new_deck).await {
    Ok(deck) => {
      tracing::info!("Created deck {} ({})", deck.name, deck.id);
      Redirect::to(&format!("/decks/{}", deck.id)).into_response()
    }
    Err(e) => backend_failure(&state, &auth, "Failed to create deck", e),
  }
}

/// GET /decks/{deck_id} - Words of a deck with edit forms
pub async fn deck_page(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(deck_id): Path<String>,
  Query(query): Query<DeckQuery>,
) -> Response {
  let api = auth.api(&state);

  let words = match api::vocabulary::fetch_deck_words(&api, &deck_id).await {
    Ok(words) => words,
    Err(e) => return backend_failure(&state, &auth, "Failed to load deck", e),
  };

  // There is no single-deck endpoint; the list is only needed for the header
  let deck = api::vocabulary::fetch_decks(&api)
    .await
    .log_warn_default("Failed to load deck list")
    .into_iter()
    .find(|d| d.id == deck_id);

  let notice = query
    .imported
    .map(|n| format!("Imported {} word{}", n, if n == 1 { "" } else { "s" }));
  let error = query.error.as_deref().map(|code| match code {
    "empty" => "Add some words before studying this deck".to_string(),
    "bulk" => "No valid lines found. Use \"word - definition\" or \"word | definition | ...\"".to_string(),
    _ => "Something went wrong".to_string(),
  });

  let template = DeckTemplate {
    nav: NavContext::from_auth(&auth),
    deck_name: deck.as_ref().map(|d| d.name.clone()).unwrap_or_else(|| "Deck".to_string()),
    description: deck.as_ref().and_then(|d| d.description.clone()),
    is_public: deck.as_ref().is_some_and(|d| d.is_public),
    share_url: deck
      .as_ref()
      .filter(|d| d.is_public && !d.public_token.is_empty())
      .map(|d| format!("/public/{}", d.public_token)),
    deck_id,
    words,
    notice,
    error,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// POST /decks/{deck_id}/words - Add one word
pub async fn add_word(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(deck_id): Path<String>,
  Form(form): Form<WordForm>,
) -> Response {
  let back = format!("/decks/{}", deck_id);
  let Some(new_word) = form.into_new_word() else {
    return Redirect::to(&back).into_response();
  };

  match api::vocabulary::add_deck_word(&auth.api(&state), &deck_id, &new_word).await {
    Ok(_) => Redirect::to(&back).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to add word", e),
  }
}

/// POST /decks/{deck_id}/words/{word_id} - Replace a word's content
pub async fn update_word(
  State(state): State<AppState>,
  auth: AuthContext,
  Path((deck_id, word_id)): Path<(String, String)>,
  Form(form): Form<WordForm>,
) -> Response {
  let back = format!("/decks/{}", deck_id);
  let Some(new_word) = form.into_new_word() else {
    return Redirect::to(&back).into_response();
  };

  match api::vocabulary::update_deck_word(&auth.api(&state), &deck_id, &word_id, &new_word).await {
    Ok(_) => Redirect::to(&back).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to update word", e),
  }
}

/// POST /decks/{deck_id}/words/{word_id}/delete
pub async fn delete_word(
  State(state): State<AppState>,
  auth: AuthContext,
  Path((deck_id, word_id)): Path<(String, String)>,
) -> Response {
  match api::vocabulary::delete_deck_word(&auth.api(&state), &deck_id, &word_id).await {
    Ok(()) => Redirect::to(&format!("/decks/{}", deck_id)).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to delete word", e),
  }
}

/// POST /decks/{deck_id}/bulk - Import many words from pasted text
pub async fn bulk_import(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(deck_id): Path<String>,
  Form(form): Form<BulkForm>,
) -> Response {
  let words = parse_bulk_words(&form.text);
  if words.is_empty() {
    return Redirect::to(&format!("/decks/{}?error=bulk", deck_id)).into_response();
  }

  match api::vocabulary::bulk_add_words(&auth.api(&state), &deck_id, &words).await {
    Ok(result) => {
      tracing::info!("Bulk imported {} words into deck {}", result.count, deck_id);
      Redirect::to(&format!("/decks/{}?imported={}", deck_id, result.count)).into_response()
    }
    Err(e) => backend_failure(&state, &auth, "Failed to import words", e),
  }
}

/// POST /decks/{deck_id}/share - Toggle the public link
pub async fn share_deck(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(deck_id): Path<String>,
  Form(form): Form<ShareForm>,
) -> Response {
  let update = DeckUpdate {
    is_public: Some(form.is_public.is_some()),
    ..DeckUpdate::default()
  };
  match api::vocabulary::update_deck(&auth.api(&state), &deck_id, &update).await {
    Ok(_) => Redirect::to(&format!("/decks/{}", deck_id)).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to update deck", e),
  }
}

/// POST /decks/{deck_id}/members - Share the deck with another account
pub async fn add_member(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(deck_id): Path<String>,
  Form(form): Form<MemberForm>,
) -> Response {
  let back = format!("/decks/{}", deck_id);
  let Some(email) = non_empty(&form.email) else {
    return Redirect::to(&back).into_response();
  };
  match api::vocabulary::add_deck_member(&auth.api(&state), &deck_id, &email).await {
    Ok(_) => Redirect::to(&back).into_response(),
    Err(e) => backend_failure(&state, &auth, "Failed to add member", e),
  }
}

/// GET /public/{token} - Read-only view of a shared deck
pub async fn public_deck_page(
  State(state): State<AppState>,
  OptionalAuth(auth): OptionalAuth,
  Path(token): Path<String>,
) -> Response {
  let nav = NavContext::from_optional(auth.as_ref());
  match api::vocabulary::fetch_public_deck(&state.api, &token).await {
    Ok(public) => {
      let template = PublicDeckTemplate {
        nav,
        token,
        deck_name: public.deck.name,
        description: public.deck.description,
        words: public.words,
      };
      Html(template.render().unwrap_or_default()).into_response()
    }
    Err(e) if e.is_not_found() => error_page(
      nav,
      StatusCode::NOT_FOUND,
      "Deck not found",
      "This link is invalid or the deck is no longer shared.",
    ),
    Err(e) => {
      tracing::warn!("Failed to load public deck: {}", e);
      error_page(nav, StatusCode::BAD_GATEWAY, "Could not load deck", e.user_message())
    }
  }
}
