use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Joins the parts of a multi-part answer before it is sent for scoring
pub const ANSWER_SEPARATOR: &str = " || ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerFormat {
  Multi,
  MultiSelect,
  #[default]
  #[serde(other)]
  Single,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMeta {
  #[serde(default)]
  pub answer_format: AnswerFormat,
  #[serde(default)]
  pub expected_count: Option<usize>,
  #[serde(default)]
  pub instructions: Option<String>,
}

/// How a question is answered on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionInput {
  /// Pick any number of the listed options
  Checkboxes,
  /// Pick exactly one of the listed options
  Radio,
  /// Fill in this many separate blanks
  Blanks(usize),
  Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingQuestion {
  pub question_id: String,
  #[serde(default)]
  pub question_type: String,
  pub prompt: String,
  #[serde(default)]
  pub options: Option<Vec<String>>,
  #[serde(default)]
  pub correct_answer: Option<String>,
  #[serde(default)]
  pub correct_answers: Option<Vec<String>>,
  #[serde(default)]
  pub meta: Option<QuestionMeta>,
}

impl ReadingQuestion {
  pub fn answer_format(&self) -> AnswerFormat {
    self.meta.as_ref().map(|m| m.answer_format).unwrap_or_default()
  }

  pub fn instructions(&self) -> Option<&str> {
    self.meta.as_ref().and_then(|m| m.instructions.as_deref())
  }

  pub fn input(&self) -> QuestionInput {
    let has_options = self.options.as_ref().is_some_and(|o| !o.is_empty());
    match self.answer_format() {
      AnswerFormat::MultiSelect if has_options => QuestionInput::Checkboxes,
      _ if has_options => QuestionInput::Radio,
      AnswerFormat::Multi => {
        let count = self
          .meta
          .as_ref()
          .and_then(|m| m.expected_count)
          .filter(|&n| n > 0)
          .or_else(|| self.correct_answers.as_ref().map(Vec::len).filter(|&n| n > 0))
          .unwrap_or(2);
        QuestionInput::Blanks(count)
      }
      _ => QuestionInput::Text,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingTest {
  #[serde(alias = "_id", default)]
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub passage: String,
  #[serde(default)]
  pub difficulty: String,
  #[serde(default)]
  pub timer_minutes: u32,
  #[serde(default)]
  pub questions: Vec<ReadingQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadingAttempt {
  pub test_id: String,
  pub time_spent_seconds: u64,
  pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingResult {
  #[serde(default)]
  pub percentage: f64,
  #[serde(default)]
  pub awarded_xp: u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn question(json: serde_json::Value) -> ReadingQuestion {
    serde_json::from_value(json).unwrap()
  }

  #[test]
  fn test_question_inputs() {
    let tfng = question(serde_json::json!({
      "question_id": "q1",
      "question_type": "tfng",
      "prompt": "Bees dance",
      "options": ["True", "False", "Not Given"]
    }));
    assert_eq!(tfng.input(), QuestionInput::Radio);

    let pick_two = question(serde_json::json!({
      "question_id": "q2",
      "prompt": "Choose TWO",
      "options": ["A", "B", "C"],
      "meta": {"type": "mcq", "answerFormat": "multi-select", "expectedCount": 2}
    }));
    assert_eq!(pick_two.input(), QuestionInput::Checkboxes);

    let blanks = question(serde_json::json!({
      "question_id": "q3",
      "prompt": "Complete the notes",
      "correct_answers": ["nectar", "pollen", "wax"],
      "meta": {"answerFormat": "multi"}
    }));
    assert_eq!(blanks.input(), QuestionInput::Blanks(3));

    let short = question(serde_json::json!({"question_id": "q4", "prompt": "Who?"}));
    assert_eq!(short.input(), QuestionInput::Text);
    assert_eq!(short.answer_format(), AnswerFormat::Single);
  }

  #[test]
  fn test_unknown_answer_format_is_single() {
    let q = question(serde_json::json!({
      "question_id": "q5",
      "prompt": "?",
      "meta": {"answerFormat": "essay", "instructions": "NO MORE THAN TWO WORDS"}
    }));
    assert_eq!(q.answer_format(), AnswerFormat::Single);
    assert_eq!(q.instructions(), Some("NO MORE THAN TWO WORDS"));
  }

  #[test]
  fn test_reading_test_accepts_underscore_id() {
    let test: ReadingTest = serde_json::from_str(r#"{"_id": "r1", "title": "Bees", "passage": "..."}"#).unwrap();
    assert_eq!(test.id, "r1");
    assert!(test.questions.is_empty());
  }
}
