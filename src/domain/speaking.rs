use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SpeakingPrompt {
  pub topic: String,
  pub scenario: String,
  #[serde(default)]
  pub hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakingAttempt {
  pub expected_text: String,
  pub spoken_text: String,
}

/// Scores for one spoken attempt. Older scorers report pronunciation,
/// coherence and lexical instead of accuracy, fluency and completeness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakingScore {
  pub accuracy: Option<f64>,
  pub fluency: Option<f64>,
  pub completeness: Option<f64>,
  pub band: Option<f64>,
  pub pronunciation: Option<f64>,
  pub coherence: Option<f64>,
  pub lexical: Option<f64>,
  pub overall_band: Option<f64>,
  pub feedback: Option<String>,
}

impl SpeakingScore {
  pub fn accuracy(&self) -> Option<f64> {
    self.accuracy.or(self.pronunciation)
  }

  pub fn fluency(&self) -> Option<f64> {
    self.fluency.or(self.coherence)
  }

  pub fn completeness(&self) -> Option<f64> {
    self.completeness.or(self.lexical)
  }

  pub fn band(&self) -> Option<f64> {
    self.overall_band.or(self.band)
  }
}
