//! Typed-answer checking for the fill-blank and listen-write drills.
//!
//! Checking is advisory: the learner always decides when to continue.

use unicode_normalization::UnicodeNormalization;

/// British/American spelling equivalences (normalized to American).
/// IELTS accepts either spelling.
static SPELLING_EQUIVALENCES: &[(&str, &str)] = &[
  ("colour", "color"),
  ("behaviour", "behavior"),
  ("favour", "favor"),
  ("honour", "honor"),
  ("humour", "humor"),
  ("labour", "labor"),
  ("neighbour", "neighbor"),
  ("centre", "center"),
  ("fibre", "fiber"),
  ("litre", "liter"),
  ("metre", "meter"),
  ("theatre", "theater"),
  ("grey", "gray"),
  ("analyse", "analyze"),
  ("defence", "defense"),
  ("offence", "offense"),
  ("licence", "license"),
  ("practise", "practice"),
  ("traveller", "traveler"),
  ("cancelled", "canceled"),
  ("jewellery", "jewelry"),
  ("programme", "program"),
  ("favourite", "favorite"),
  ("organise", "organize"),
  ("realise", "realize"),
  ("recognise", "recognize"),
  ("emphasise", "emphasize"),
  ("prioritise", "prioritize"),
];

/// Result of checking a typed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResult {
  Correct,
  /// Within typo tolerance of the headword
  CloseEnough,
  Incorrect,
}

impl AnswerResult {
  pub fn is_correct(&self) -> bool {
    !matches!(self, Self::Incorrect)
  }

  pub fn message(&self) -> &'static str {
    match self {
      Self::Correct => "Correct!",
      Self::CloseEnough => "Almost - check the spelling.",
      Self::Incorrect => "Not quite.",
    }
  }

  pub fn css_class(&self) -> &'static str {
    match self {
      Self::Correct => "check-correct",
      Self::CloseEnough => "check-close",
      Self::Incorrect => "check-incorrect",
    }
  }
}

/// Normalize an answer for comparison
/// - Unicode NFC
/// - Lowercase, trimmed
/// - Punctuation removed (apostrophes and hyphens kept)
/// - British spellings mapped to American
/// - Whitespace collapsed
fn normalize_answer(input: &str) -> String {
  let cleaned: String = input
    .nfc()
    .collect::<String>()
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'' || *c == '-')
    .collect();

  cleaned
    .split_whitespace()
    .map(|word| {
      SPELLING_EQUIVALENCES
        .iter()
        .find(|(british, _)| *british == word)
        .map(|(_, american)| *american)
        .unwrap_or(word)
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Calculate simple Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
  let a_chars: Vec<char> = a.chars().collect();
  let b_chars: Vec<char> = b.chars().collect();

  if a_chars.is_empty() {
    return b_chars.len();
  }
  if b_chars.is_empty() {
    return a_chars.len();
  }

  let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
  let mut curr = vec![0usize; b_chars.len() + 1];

  for (i, ac) in a_chars.iter().enumerate() {
    curr[0] = i + 1;
    for (j, bc) in b_chars.iter().enumerate() {
      let cost = if ac == bc { 0 } else { 1 };
      curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  prev[b_chars.len()]
}

/// Check a typed answer against the expected headword
pub fn check_answer(user_input: &str, expected: &str) -> AnswerResult {
  let input = normalize_answer(user_input);
  let expected = normalize_answer(expected);

  if input.is_empty() || expected.is_empty() {
    return AnswerResult::Incorrect;
  }
  if input == expected {
    return AnswerResult::Correct;
  }

  // Typo tolerance based on answer length
  let max_distance = match expected.chars().count() {
    0..=3 => 0,
    4..=7 => 1,
    _ => 2,
  };

  if levenshtein_distance(&input, &expected) <= max_distance {
    AnswerResult::CloseEnough
  } else {
    AnswerResult::Incorrect
  }
}
