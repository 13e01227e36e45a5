use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTE_TITLE: &str = "Quick Note";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteBlock {
  pub block_id: String,
  pub block_type: String,
  #[serde(default)]
  pub content: String,
}

impl NoteBlock {
  pub fn paragraph(content: &str) -> Self {
    Self {
      block_id: "body".to_string(),
      block_type: "paragraph".to_string(),
      content: content.to_string(),
    }
  }
}

/// Workspace document made of text blocks
#[derive(Debug, Clone, Deserialize)]
pub struct NoteDocument {
  #[serde(alias = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub blocks: Vec<NoteBlock>,
}

/// Saving with a `document_id` replaces that document's blocks; without one a
/// new document is created.
#[derive(Debug, Clone, Serialize)]
pub struct NoteSave {
  pub document_id: Option<String>,
  pub title: String,
  pub blocks: Vec<NoteBlock>,
}
