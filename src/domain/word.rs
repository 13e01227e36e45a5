use serde::{Deserialize, Serialize};

/// Vocabulary entry owned by a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
  #[serde(alias = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub deck_id: String,
  /// Headword
  pub word: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phonetic: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub part_of_speech: Option<String>,
  #[serde(default)]
  pub definition: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub example: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub created_by: String,
  #[serde(default)]
  pub created_at: String,
  #[serde(default)]
  pub updated_at: String,
}

/// Payload for creating or editing a word
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewWord {
  pub word: String,
  pub definition: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phonetic: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub part_of_speech: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub example: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
}

/// Spaced-repetition card record. Shares its id with the word it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
  #[serde(alias = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub front: String,
  #[serde(default)]
  pub back: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub example: Option<String>,
  #[serde(default)]
  pub level: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next_review_at: Option<String>,
}
