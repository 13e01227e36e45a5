//! Fill-the-blank sentence masking.

use regex::RegexBuilder;

use crate::config;

/// Example sentence split around the masked headword.
///
/// `segments` holds the text between blanks, so a sentence with `n` blanks
/// has `n + 1` segments. A missing example yields no segments at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankedExample {
  pub segments: Vec<String>,
}

impl BlankedExample {
  /// Mask every case-insensitive occurrence of `headword` in `example`
  pub fn new(example: Option<&str>, headword: &str) -> Self {
    let Some(example) = example.filter(|e| !e.trim().is_empty()) else {
      return Self::default();
    };
    let headword = headword.trim();
    if headword.is_empty() {
      return Self {
        segments: vec![example.to_string()],
      };
    }

    let pattern = RegexBuilder::new(&regex::escape(headword))
      .case_insensitive(true)
      .build();
    let segments = match pattern {
      Ok(re) => re.split(example).map(str::to_string).collect(),
      Err(e) => {
        tracing::warn!("Failed to build blank pattern for {:?}: {}", headword, e);
        vec![example.to_string()]
      }
    };

    Self { segments }
  }

  pub fn blank_count(&self) -> usize {
    self.segments.len().saturating_sub(1)
  }

  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }

  /// Sentence with blanks rendered as the marker
  pub fn masked(&self) -> String {
    self.segments.join(config::BLANK_MARKER)
  }
}
