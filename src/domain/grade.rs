use serde::{Deserialize, Serialize};

use crate::config;

/// Learner-supplied difficulty rating. Higher is easier.
///
/// Only transmitted to the backend, which owns the scheduling math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
  pub const EASY: Grade = Grade(5);
  pub const MEDIUM: Grade = Grade(4);
  pub const HARD: Grade = Grade(2);

  pub fn new(value: u8) -> Option<Self> {
    if (config::GRADE_MIN..=config::GRADE_MAX).contains(&value) {
      Some(Self(value))
    } else {
      None
    }
  }

  pub fn value(&self) -> u8 {
    self.0
  }
}

impl TryFrom<u8> for Grade {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Grade::new(value).ok_or_else(|| {
      format!(
        "grade {} outside {}..={}",
        value,
        config::GRADE_MIN,
        config::GRADE_MAX
      )
    })
  }
}

impl From<Grade> for u8 {
  fn from(grade: Grade) -> u8 {
    grade.0
  }
}

/// Rating buttons shown on the back of a flashcard
#[derive(Debug, Clone, Copy)]
pub struct GradeButton {
  pub grade: Grade,
  pub label: &'static str,
  pub class: &'static str,
}

pub const GRADE_BUTTONS: [GradeButton; 3] = [
  GradeButton {
    grade: Grade::EASY,
    label: "Easy",
    class: "grade-easy",
  },
  GradeButton {
    grade: Grade::MEDIUM,
    label: "Medium",
    class: "grade-medium",
  },
  GradeButton {
    grade: Grade::HARD,
    label: "Hard",
    class: "grade-hard",
  },
];
