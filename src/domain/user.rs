use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  #[serde(alias = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub full_name: String,
  pub email: String,
  #[serde(default)]
  pub xp: u32,
  #[serde(default)]
  pub coins: u32,
  #[serde(default)]
  pub streak: u32,
  #[serde(default)]
  pub level: String,
  #[serde(default)]
  pub badges: Vec<String>,
}

impl User {
  /// Name shown in the navigation bar
  pub fn display_name(&self) -> &str {
    if self.full_name.trim().is_empty() {
      &self.email
    } else {
      &self.full_name
    }
  }
}

/// Body of a successful login or token refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default)]
  pub refresh_token: Option<String>,
  #[serde(default = "default_token_type")]
  pub token_type: String,
  #[serde(default)]
  pub user: Option<User>,
}

fn default_token_type() -> String {
  "bearer".to_string()
}
