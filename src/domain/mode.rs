use serde::{Deserialize, Serialize};

/// One of the four practice formats applied to a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrillMode {
  /// Reveal-and-rate card; the only mode that records a grade
  Flashcard,
  FillBlank,
  MultipleChoice,
  ListenWrite,
}

impl DrillMode {
  /// All modes in display order
  pub const ALL: [DrillMode; 4] = [
    DrillMode::Flashcard,
    DrillMode::FillBlank,
    DrillMode::MultipleChoice,
    DrillMode::ListenWrite,
  ];

  /// Modes drilled after the word has been rated, in the order they are offered
  pub const FOLLOW_UP: [DrillMode; 3] = [
    DrillMode::FillBlank,
    DrillMode::MultipleChoice,
    DrillMode::ListenWrite,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Flashcard => "flashcard",
      Self::FillBlank => "fill-blank",
      Self::MultipleChoice => "multiple-choice",
      Self::ListenWrite => "listen-write",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "flashcard" => Some(Self::Flashcard),
      "fill-blank" => Some(Self::FillBlank),
      "multiple-choice" => Some(Self::MultipleChoice),
      "listen-write" => Some(Self::ListenWrite),
      _ => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Flashcard => "Flashcard",
      Self::FillBlank => "Fill the blank",
      Self::MultipleChoice => "Multiple choice",
      Self::ListenWrite => "Listen & write",
    }
  }

  fn bit(&self) -> u8 {
    match self {
      Self::Flashcard => 0b0001,
      Self::FillBlank => 0b0010,
      Self::MultipleChoice => 0b0100,
      Self::ListenWrite => 0b1000,
    }
  }
}

/// Set of drill modes, one bit per mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSet(u8);

impl ModeSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if the mode was not already present
  pub fn insert(&mut self, mode: DrillMode) -> bool {
    let added = !self.contains(mode);
    self.0 |= mode.bit();
    added
  }

  pub fn contains(&self, mode: DrillMode) -> bool {
    self.0 & mode.bit() != 0
  }

  pub fn len(&self) -> usize {
    self.0.count_ones() as usize
  }

  pub fn is_empty(&self) -> bool {
    self.0 == 0
  }

  /// All four modes present
  pub fn is_complete(&self) -> bool {
    DrillMode::ALL.iter().all(|m| self.contains(*m))
  }

  pub fn iter(&self) -> impl Iterator<Item = DrillMode> + '_ {
    DrillMode::ALL.into_iter().filter(|m| self.contains(*m))
  }
}

impl FromIterator<DrillMode> for ModeSet {
  fn from_iter<I: IntoIterator<Item = DrillMode>>(iter: I) -> Self {
    let mut set = ModeSet::new();
    for mode in iter {
      set.insert(mode);
    }
    set
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mode_str_roundtrip() {
    for mode in DrillMode::ALL {
      assert_eq!(DrillMode::from_str(mode.as_str()), Some(mode));
    }
    assert_eq!(DrillMode::from_str("speaking"), None);
  }

  #[test]
  fn test_mode_serde_uses_kebab_case() {
    let json = serde_json::to_string(&DrillMode::MultipleChoice).unwrap();
    assert_eq!(json, "\"multiple-choice\"");
  }

  #[test]
  fn test_insert_is_unique() {
    let mut set = ModeSet::new();
    assert!(set.insert(DrillMode::FillBlank));
    assert!(!set.insert(DrillMode::FillBlank));
    assert_eq!(set.len(), 1);
    assert!(set.contains(DrillMode::FillBlank));
    assert!(!set.contains(DrillMode::Flashcard));
  }

  #[test]
  fn test_complete_requires_all_four() {
    let mut set: ModeSet = DrillMode::FOLLOW_UP.into_iter().collect();
    assert!(!set.is_complete());
    set.insert(DrillMode::Flashcard);
    assert!(set.is_complete());
    assert_eq!(set.iter().collect::<Vec<_>>(), DrillMode::ALL.to_vec());
  }

  #[test]
  fn test_empty_set() {
    let set = ModeSet::new();
    assert!(set.is_empty());
    assert_eq!(set.iter().count(), 0);
  }
}
