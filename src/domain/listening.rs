use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ListeningSentence {
  pub sentence_id: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub start_ms: u64,
  #[serde(default)]
  pub end_ms: u64,
  #[serde(default)]
  pub hint_word_count: usize,
  #[serde(default)]
  pub hint_first_letters: Vec<String>,
}

impl ListeningSentence {
  /// Word count and first letters, e.g. `5 words · T · b · d`
  pub fn hint(&self) -> String {
    let unit = if self.hint_word_count == 1 { "word" } else { "words" };
    let mut hint = format!("{} {}", self.hint_word_count, unit);
    if !self.hint_first_letters.is_empty() {
      hint.push_str(" · ");
      hint.push_str(&self.hint_first_letters.join(" · "));
    }
    hint
  }

  /// Media fragment URL that plays only this sentence
  pub fn clip_url(&self, audio_url: &str) -> String {
    if self.end_ms <= self.start_ms {
      return audio_url.to_string();
    }
    format!(
      "{}#t={},{}",
      audio_url,
      millis_to_seconds(self.start_ms),
      millis_to_seconds(self.end_ms)
    )
  }
}

fn millis_to_seconds(ms: u64) -> String {
  if ms % 1000 == 0 {
    (ms / 1000).to_string()
  } else {
    format!("{:.3}", ms as f64 / 1000.0)
      .trim_end_matches('0')
      .to_string()
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListeningTest {
  #[serde(alias = "_id", default)]
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub audio_url: String,
  #[serde(default)]
  pub sentences: Vec<ListeningSentence>,
}

impl ListeningTest {
  pub fn sentence(&self, sentence_id: &str) -> Option<&ListeningSentence> {
    self.sentences.iter().find(|s| s.sentence_id == sentence_id)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct DictationAttempt {
  pub test_id: String,
  pub sentence_id: String,
  pub attempt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictationResult {
  /// Fraction of the sentence heard correctly, 0 to 1
  #[serde(default)]
  pub accuracy: f64,
  #[serde(default)]
  pub awarded_xp: u32,
}

impl DictationResult {
  pub fn percent(&self) -> u32 {
    (self.accuracy.clamp(0.0, 1.0) * 100.0).round() as u32
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sentence(start_ms: u64, end_ms: u64) -> ListeningSentence {
    ListeningSentence {
      sentence_id: "s1".to_string(),
      text: "The bus departs at noon".to_string(),
      start_ms,
      end_ms,
      hint_word_count: 5,
      hint_first_letters: vec!["T".into(), "b".into(), "d".into(), "a".into(), "n".into()],
    }
  }

  #[test]
  fn test_hint() {
    assert_eq!(sentence(0, 0).hint(), "5 words · T · b · d · a · n");
    let single = ListeningSentence {
      hint_word_count: 1,
      hint_first_letters: Vec::new(),
      ..sentence(0, 0)
    };
    assert_eq!(single.hint(), "1 word");
  }

  #[test]
  fn test_clip_url() {
    assert_eq!(sentence(1500, 4000).clip_url("/a.mp3"), "/a.mp3#t=1.5,4");
    assert_eq!(sentence(250, 1125).clip_url("/a.mp3"), "/a.mp3#t=0.25,1.125");
    // Missing timings play the whole recording
    assert_eq!(sentence(0, 0).clip_url("/a.mp3"), "/a.mp3");
  }

  #[test]
  fn test_dictation_percent() {
    let result: DictationResult = serde_json::from_str(r#"{"accuracy": 0.876, "awarded_xp": 5}"#).unwrap();
    assert_eq!(result.percent(), 88);
    assert_eq!(DictationResult { accuracy: 1.7, awarded_xp: 0 }.percent(), 100);
  }
}
