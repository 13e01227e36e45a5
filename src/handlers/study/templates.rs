//! Template, view and form structs for study handlers.

use askama::Template;
use serde::Deserialize;

use super::super::NavContext;
use crate::config;
use crate::domain::{DrillMode, Grade, GRADE_BUTTONS};
use crate::filters;
use crate::study::{Choice, ModeStatus, StudySession};

#[derive(Template)]
#[template(path = "study/session.html")]
pub struct StudyTemplate {
  pub nav: NavContext,
  pub view: StudyView,
}

#[derive(Template)]
#[template(path = "study/complete.html")]
pub struct CompleteTemplate {
  pub nav: NavContext,
  pub total: usize,
  pub graded: usize,
  pub notices: Vec<String>,
}

pub struct ModePill {
  pub label: &'static str,
  pub class: &'static str,
}

pub struct ChoiceView {
  pub index: usize,
  pub text: String,
  pub placeholder: bool,
  pub class: &'static str,
}

pub struct GradeButtonView {
  pub value: u8,
  pub label: &'static str,
  pub class: &'static str,
}

/// Everything the study page shows, flattened for the template
pub struct StudyView {
  pub session_id: String,
  /// Pronunciation of the current word; unique per word
  pub audio_url: String,
  pub position: usize,
  pub total: usize,
  pub percent: usize,
  pub mode: &'static str,
  pub mode_label: &'static str,
  pub pills: Vec<ModePill>,

  pub word: String,
  pub phonetic: Option<String>,
  pub part_of_speech: Option<String>,
  pub definition: String,
  pub explanation: Option<String>,
  pub notes: Option<String>,
  pub example: Option<String>,

  pub revealed: bool,
  pub answer: String,
  pub check_message: Option<&'static str>,
  pub check_class: &'static str,
  /// Example sentence split around the blanks
  pub blank_segments: Vec<String>,
  pub blank_marker: &'static str,
  pub choices: Vec<ChoiceView>,
  /// Multiple choice option selected
  pub answered: bool,
  pub answer_correct: bool,
  pub grade_buttons: Vec<GradeButtonView>,
  pub notices: Vec<String>,
}

impl StudyView {
  pub fn build(session_id: &str, session: &mut StudySession) -> Self {
    let mode = session.mode();

    // Generated once per drill and kept in the session
    let options = if mode == DrillMode::MultipleChoice {
      session.choices().map(<[Choice]>::to_vec).unwrap_or_default()
    } else {
      Vec::new()
    };

    let item = session.current();
    let drill = session.drill();
    let target = item.word.word.as_str();

    let choices: Vec<ChoiceView> = options
      .iter()
      .enumerate()
      .map(|(index, choice)| {
        let class = match (drill.selected, choice) {
          (_, Choice::Placeholder) => "choice choice-empty",
          (Some(_), c) if c.matches(target) => "choice choice-correct",
          (Some(selected), _) if selected == index => "choice choice-wrong",
          _ => "choice",
        };
        ChoiceView {
          index,
          text: choice.text().unwrap_or("No option").to_string(),
          placeholder: choice.is_placeholder(),
          class,
        }
      })
      .collect();
    let answer_correct = drill
      .selected
      .and_then(|i| options.get(i))
      .is_some_and(|c| c.matches(target));

    let pills = session
      .mode_statuses()
      .into_iter()
      .map(|(mode, status)| ModePill {
        label: mode.label(),
        class: match status {
          ModeStatus::Current => "pill pill-current",
          ModeStatus::Done => "pill pill-done",
          ModeStatus::Pending => "pill",
        },
      })
      .collect();

    let position = session.index() + 1;
    let total = session.len();

    StudyView {
      session_id: session_id.to_string(),
      audio_url: format!("/study/{}/tts/{}", session_id, session.index()),
      position,
      total,
      percent: position * 100 / total.max(1),
      mode: mode.as_str(),
      mode_label: mode.label(),
      pills,
      word: item.word.word.clone(),
      phonetic: item.word.phonetic.clone(),
      part_of_speech: item.word.part_of_speech.clone(),
      definition: item.word.definition.clone(),
      explanation: item.word.explanation.clone(),
      notes: item.word.notes.clone(),
      example: item.word.example.clone(),
      revealed: drill.revealed,
      answer: drill.answer.clone(),
      check_message: drill.check.map(|c| c.message()),
      check_class: drill.check.map_or("", |c| c.css_class()),
      blank_segments: session.blanked_example().segments,
      blank_marker: config::BLANK_MARKER,
      choices,
      answered: drill.selected.is_some(),
      answer_correct,
      grade_buttons: GRADE_BUTTONS
        .iter()
        .map(|b| GradeButtonView {
          value: b.grade.value(),
          label: b.label,
          class: b.class,
        })
        .collect(),
      notices: Vec::new(),
    }
  }
}

#[derive(Deserialize)]
pub struct AnswerForm {
  #[serde(default)]
  pub answer: String,
}

/// Fields are parsed by the handlers so malformed posts land back on the page
#[derive(Deserialize)]
pub struct ChoiceForm {
  #[serde(default)]
  pub choice: String,
}

impl ChoiceForm {
  pub fn index(&self) -> Option<usize> {
    self.choice.trim().parse().ok()
  }
}

#[derive(Deserialize)]
pub struct GradeForm {
  #[serde(default)]
  pub grade: String,
}

impl GradeForm {
  pub fn grade(&self) -> Option<Grade> {
    self.grade.trim().parse().ok().and_then(Grade::new)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_malformed_form_values() {
    let form = |v: &str| ChoiceForm { choice: v.to_string() };
    assert_eq!(form("2").index(), Some(2));
    assert_eq!(form("").index(), None);
    assert_eq!(form("-1").index(), None);
    assert_eq!(form("two").index(), None);

    let grade = |v: &str| GradeForm { grade: v.to_string() };
    assert_eq!(grade("4").grade(), Some(Grade::MEDIUM));
    assert_eq!(grade("9").grade(), None);
    assert_eq!(grade("300").grade(), None);
    assert_eq!(grade("easy").grade(), None);
  }
}
