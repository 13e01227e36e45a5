use serde::{Deserialize, Serialize};

use super::Word;

/// Named, ownable collection of words, optionally shared through a public link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
  #[serde(alias = "_id", default)]
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub owner_id: String,
  #[serde(default)]
  pub member_ids: Vec<String>,
  #[serde(default)]
  pub is_public: bool,
  #[serde(default)]
  pub public_token: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<String>,
  #[serde(default)]
  pub created_at: String,
  #[serde(default)]
  pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDeck {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub is_public: bool,
}

/// Partial deck update; absent fields are left untouched by the backend
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeckUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_public: Option<bool>,
}

/// Deck reached through its public share token
#[derive(Debug, Clone, Deserialize)]
pub struct PublicDeck {
  pub deck: Deck,
  #[serde(default)]
  pub words: Vec<Word>,
}

/// Result of a bulk word import
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkImportResult {
  #[serde(default)]
  pub count: usize,
  #[serde(default)]
  pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeatmapDay {
  pub date: String,
  pub minutes: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeakSkill {
  pub skill: String,
  pub score: f64,
  #[serde(default)]
  pub trend: f64,
}

/// Progress overview shown on the landing page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardSummary {
  #[serde(default)]
  pub xp: u32,
  #[serde(default)]
  pub coins: u32,
  #[serde(default)]
  pub streak: u32,
  #[serde(default)]
  pub level: String,
  #[serde(default)]
  pub recent_words: Vec<String>,
  #[serde(default)]
  pub heatmap: Vec<HeatmapDay>,
  #[serde(default)]
  pub weak_skills: Vec<WeakSkill>,
  #[serde(default)]
  pub study_plan: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
  pub rank: u32,
  #[serde(default)]
  pub full_name: String,
  #[serde(default)]
  pub xp: u32,
}

impl DashboardSummary {
  /// Minutes studied across the heatmap window
  pub fn total_minutes(&self) -> u32 {
    self.heatmap.iter().map(|d| d.minutes).sum()
  }
}
