//! Multiple choice option generation.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::config;
use crate::domain::Word;

/// One option of a multiple choice question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
  Word(String),
  /// Empty slot used when the session has too few other words.
  /// Never selectable and never equal to the target.
  Placeholder,
}

impl Choice {
  pub fn text(&self) -> Option<&str> {
    match self {
      Choice::Word(text) => Some(text),
      Choice::Placeholder => None,
    }
  }

  pub fn is_placeholder(&self) -> bool {
    matches!(self, Choice::Placeholder)
  }

  /// Direct string match against the target headword
  pub fn matches(&self, target: &str) -> bool {
    self.text() == Some(target)
  }
}

/// Build the option list for `target` from the other words of the session.
///
/// Always returns exactly [`config::CHOICE_COUNT`] options containing the
/// target headword once. Distractors are drawn uniformly without replacement
/// from distinct headwords that differ from the target; missing slots are
/// filled with [`Choice::Placeholder`].
pub fn generate_choices<R: Rng + ?Sized>(target: &Word, pool: &[Word], rng: &mut R) -> Vec<Choice> {
  let mut candidates: Vec<&str> = pool
    .iter()
    .filter(|w| w.id != target.id && w.word != target.word && !w.word.trim().is_empty())
    .map(|w| w.word.as_str())
    .collect();
  candidates.sort_unstable();
  candidates.dedup();

  let mut choices: Vec<Choice> = Vec::with_capacity(config::CHOICE_COUNT);
  choices.push(Choice::Word(target.word.clone()));
  choices.extend(
    candidates
      .choose_multiple(rng, config::DISTRACTOR_COUNT)
      .map(|w| Choice::Word((*w).to_string())),
  );
  choices.shuffle(rng);

  while choices.len() < config::CHOICE_COUNT {
    choices.push(Choice::Placeholder);
  }

  choices
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn word(id: &str, text: &str) -> Word {
    serde_json::from_value(serde_json::json!({"id": id, "word": text, "definition": "def"})).unwrap()
  }

  fn count_target(choices: &[Choice], target: &str) -> usize {
    choices.iter().filter(|c| c.matches(target)).count()
  }

  #[test]
  fn test_full_pool_gives_four_real_options() {
    let words: Vec<Word> = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"]
      .iter()
      .enumerate()
      .map(|(i, w)| word(&i.to_string(), w))
      .collect();
    let mut rng = StdRng::seed_from_u64(7);

    for target in &words {
      let choices = generate_choices(target, &words, &mut rng);
      assert_eq!(choices.len(), 4);
      assert_eq!(count_target(&choices, &target.word), 1);
      assert!(choices.iter().all(|c| !c.is_placeholder()));

      let mut texts: Vec<&str> = choices.iter().filter_map(|c| c.text()).collect();
      texts.sort_unstable();
      texts.dedup();
      assert_eq!(texts.len(), 4, "options must be distinct");
    }
  }

  #[test]
  fn test_two_word_session_pads_with_placeholders() {
    let words = vec![word("1", "coherent"), word("2", "lexical")];
    let mut rng = StdRng::seed_from_u64(1);
    let choices = generate_choices(&words[0], &words, &mut rng);

    assert_eq!(choices.len(), 4);
    assert_eq!(count_target(&choices, "coherent"), 1);
    assert_eq!(count_target(&choices, "lexical"), 1);
    assert_eq!(choices.iter().filter(|c| c.is_placeholder()).count(), 2);
  }

  #[test]
  fn test_single_word_session() {
    let words = vec![word("1", "fluency")];
    let mut rng = StdRng::seed_from_u64(3);
    let choices = generate_choices(&words[0], &words, &mut rng);

    assert_eq!(choices.len(), 4);
    assert_eq!(count_target(&choices, "fluency"), 1);
    assert_eq!(choices.iter().filter(|c| c.is_placeholder()).count(), 3);
  }

  #[test]
  fn test_duplicate_headwords_never_repeat_target() {
    let words = vec![
      word("1", "band"),
      word("2", "band"),
      word("3", "score"),
      word("4", "score"),
    ];
    let mut rng = StdRng::seed_from_u64(11);
    let choices = generate_choices(&words[0], &words, &mut rng);

    assert_eq!(count_target(&choices, "band"), 1);
    assert_eq!(count_target(&choices, "score"), 1);
    assert_eq!(choices.iter().filter(|c| c.is_placeholder()).count(), 2);
  }

  #[test]
  fn test_distractors_vary_with_seed() {
    let words: Vec<Word> = (0..20).map(|i| word(&i.to_string(), &format!("word{}", i))).collect();
    let a = generate_choices(&words[0], &words, &mut StdRng::seed_from_u64(1));
    let b = generate_choices(&words[0], &words, &mut StdRng::seed_from_u64(2));
    let c = generate_choices(&words[0], &words, &mut StdRng::seed_from_u64(3));
    assert!(a != b || b != c);
  }
}
