//! IELTS band scores: 0 to 9 in half-band steps.

pub const MAX_BAND: f64 = 9.0;

/// Parse a band typed into a form. Accepts `7`, `6.5`, `7.0`; rejects
/// anything outside 0..=9 or between half steps.
pub fn parse_band(input: &str) -> Option<f64> {
  let value: f64 = input.trim().parse().ok()?;
  if !(0.0..=MAX_BAND).contains(&value) {
    return None;
  }
  let halves = value * 2.0;
  (halves.fract() == 0.0).then_some(value)
}

/// How far `score` falls short of `target`, if it does
pub fn band_gap(score: f64, target: f64) -> Option<f64> {
  let gap = target - score;
  (gap > 0.0).then_some(gap)
}

pub fn format_band(band: f64) -> String {
  format!("{:.1}", band)
}
