use serde::{Deserialize, Serialize};

/// Task 1 describes a chart or letter; Task 2 is the essay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
  Task1,
  #[default]
  Task2,
}

impl TaskType {
  pub fn as_str(&self) -> &'static str {
    match self {
      TaskType::Task1 => "task1",
      TaskType::Task2 => "task2",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "task1" => Some(TaskType::Task1),
      "task2" => Some(TaskType::Task2),
      _ => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      TaskType::Task1 => "Task 1",
      TaskType::Task2 => "Task 2",
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WritingPrompt {
  #[serde(alias = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub task_type: String,
}

impl WritingPrompt {
  /// Strip the model's JSON and markdown wrapping from title and description
  pub fn cleaned(self) -> Self {
    let title = clean_prompt_description(&self.title);
    Self {
      title: if title.is_empty() {
        "IELTS Writing Task".to_string()
      } else {
        title
      },
      description: clean_prompt_description(&self.description),
      ..self
    }
  }
}

/// Generated prompts sometimes arrive as a fenced JSON object instead of
/// plain text. Returns the plain description either way.
pub fn clean_prompt_description(raw: &str) -> String {
  let cleaned: Vec<&str> = raw
    .trim()
    .lines()
    .filter(|line| !line.trim_start().starts_with("```"))
    .collect();
  let cleaned = cleaned.join("\n").replace('`', "");
  let cleaned = cleaned.trim();

  if cleaned.starts_with('{') || cleaned.starts_with('"') {
    match serde_json::from_str::<serde_json::Value>(cleaned) {
      Ok(serde_json::Value::Object(map)) => {
        if let Some(description) = map.get("description").and_then(|d| d.as_str()) {
          return description.trim().to_string();
        }
      }
      Ok(serde_json::Value::String(text)) => return text.trim().to_string(),
      _ => {}
    }
  }
  cleaned.to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct EssaySubmission {
  pub task_type: TaskType,
  pub content: String,
  pub prompt_content: String,
  pub target_band: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImprovedChange {
  pub original: String,
  pub improved: String,
  /// `spelling`, `grammar`, `word` or `sentence`
  #[serde(rename = "type", default)]
  pub kind: String,
  #[serde(default)]
  pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexicalSuggestion {
  pub word: String,
  pub suggestion: String,
  #[serde(default)]
  pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeakSentence {
  pub original: String,
  pub improved: String,
  #[serde(default)]
  pub reason: String,
}

/// Examiner-style assessment of one essay
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WritingFeedback {
  #[serde(default)]
  pub grammar: f64,
  #[serde(default)]
  pub lexical: f64,
  #[serde(default)]
  pub coherence: f64,
  #[serde(default)]
  pub task: f64,
  #[serde(default)]
  pub overall_band: f64,
  #[serde(default)]
  pub feedback: String,
  #[serde(default)]
  pub improved_version: Option<String>,
  #[serde(default)]
  pub improved_changes: Vec<ImprovedChange>,
  #[serde(default)]
  pub suggestions: Vec<String>,
  #[serde(default)]
  pub citations: Vec<String>,
  #[serde(default)]
  pub grammar_errors: Vec<String>,
  #[serde(default)]
  pub lexical_suggestions: Vec<LexicalSuggestion>,
  #[serde(default)]
  pub weak_sentences: Vec<WeakSentence>,
}

impl WritingFeedback {
  /// Corrections ordered spelling, grammar, word choice, then whole sentences
  pub fn ordered_changes(&self) -> Vec<&ImprovedChange> {
    let priority = |kind: &str| match kind {
      "spelling" => 0,
      "grammar" => 1,
      "word" | "vocabulary" => 2,
      _ => 3,
    };
    let mut changes: Vec<&ImprovedChange> = self.improved_changes.iter().collect();
    changes.sort_by_key(|c| priority(&c.kind));
    changes
  }
}
