//! Study session controller.
//!
//! Drives a learner through the four drill modes for every word of a deck,
//! in order. The flashcard drill always comes first for a word because it is
//! the one that records a grade; the remaining modes follow in fixed order.
//! The controller is pure state: it never talks to the backend itself but
//! hands a [`ReviewRequest`] back to the caller when a grade must be sent.

use rand::Rng;
use thiserror::Error;

use crate::domain::{DrillMode, Flashcard, Grade, ModeSet, Word};

use super::answer::{check_answer, AnswerResult};
use super::blank::BlankedExample;
use super::choices::{generate_choices, Choice};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudyError {
  #[error("cannot start a study session without words")]
  EmptyQueue,
  #[error("the study session is already finished")]
  SessionFinished,
  #[error("grading is only possible in flashcard mode (current mode: {0})")]
  NotInFlashcardMode(&'static str),
  #[error("this word has already been graded")]
  AlreadyGraded,
  #[error("the flashcard must be graded or skipped")]
  GradeRequired,
  #[error("select an answer before continuing")]
  AnswerNotRevealed,
  #[error("operation not available in {0} mode")]
  WrongMode(&'static str),
  #[error("invalid choice {0}")]
  InvalidChoice(usize),
}

/// One word of the session with its per-session progress
#[derive(Debug, Clone)]
pub struct StudyQueueItem {
  pub word: Word,
  pub card: Option<Flashcard>,
  /// Set at most once, by grading the flashcard drill
  pub grade: Option<Grade>,
  pub completed: ModeSet,
}

impl StudyQueueItem {
  fn new(word: Word, card: Option<Flashcard>) -> Self {
    Self {
      word,
      card,
      grade: None,
      completed: ModeSet::new(),
    }
  }

  pub fn is_finished(&self) -> bool {
    next_mode(self).is_none()
  }
}

/// Grade to be sent to the backend review endpoint
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReviewRequest {
  pub card_id: String,
  pub grade: Grade,
}

/// Where the session moved after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// Same word, next drill
  Mode(DrillMode),
  /// Next word, starting again at the flashcard drill
  Item(usize),
  /// Every drill of every word is done
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
  /// Present only when the word has a flashcard
  pub review: Option<ReviewRequest>,
  pub transition: Transition,
}

/// Interaction state of the drill on screen. Reset whenever the word or mode changes.
#[derive(Debug, Clone, Default)]
pub struct DrillState {
  /// Flashcard flipped, answer shown, or multiple choice answered
  pub revealed: bool,
  pub answer: String,
  pub check: Option<AnswerResult>,
  /// Multiple choice options, generated once when the drill is first shown
  pub choices: Vec<Choice>,
  pub selected: Option<usize>,
}

/// Status of one mode for the progress pills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
  Current,
  Done,
  Pending,
}

/// Mode-advance rule.
///
/// An ungraded word starts with the flashcard drill; afterwards the first
/// follow-up mode not yet completed is chosen. `None` means the word is done.
pub fn next_mode(item: &StudyQueueItem) -> Option<DrillMode> {
  if item.grade.is_none() && !item.completed.contains(DrillMode::Flashcard) {
    return Some(DrillMode::Flashcard);
  }
  DrillMode::FOLLOW_UP
    .into_iter()
    .find(|mode| !item.completed.contains(*mode))
}

#[derive(Debug, Clone)]
pub struct StudySession {
  queue: Vec<StudyQueueItem>,
  index: usize,
  mode: DrillMode,
  drill: DrillState,
  finished: bool,
}

impl StudySession {
  /// Build a session from the deck's words, pairing each word with the
  /// flashcard that shares its id.
  pub fn new(words: Vec<Word>, flashcards: &[Flashcard]) -> Result<Self, StudyError> {
    if words.is_empty() {
      return Err(StudyError::EmptyQueue);
    }

    let queue = words
      .into_iter()
      .map(|word| {
        let card = flashcards.iter().find(|c| c.id == word.id).cloned();
        StudyQueueItem::new(word, card)
      })
      .collect();

    Ok(Self {
      queue,
      index: 0,
      mode: DrillMode::Flashcard,
      drill: DrillState::default(),
      finished: false,
    })
  }

  pub fn index(&self) -> usize {
    self.index
  }

  pub fn len(&self) -> usize {
    self.queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  pub fn mode(&self) -> DrillMode {
    self.mode
  }

  pub fn is_finished(&self) -> bool {
    self.finished
  }

  pub fn items(&self) -> &[StudyQueueItem] {
    &self.queue
  }

  pub fn current(&self) -> &StudyQueueItem {
    &self.queue[self.index]
  }

  pub fn drill(&self) -> &DrillState {
    &self.drill
  }

  /// Number of graded words
  pub fn graded_count(&self) -> usize {
    self.queue.iter().filter(|i| i.grade.is_some()).count()
  }

  /// Per-mode status of the current word, in display order
  pub fn mode_statuses(&self) -> Vec<(DrillMode, ModeStatus)> {
    let completed = self.current().completed;
    DrillMode::ALL
      .into_iter()
      .map(|mode| {
        let status = if !self.finished && mode == self.mode {
          ModeStatus::Current
        } else if completed.contains(mode) {
          ModeStatus::Done
        } else {
          ModeStatus::Pending
        };
        (mode, status)
      })
      .collect()
  }

  /// Example sentence of the current word with the headword masked
  pub fn blanked_example(&self) -> BlankedExample {
    let word = &self.current().word;
    BlankedExample::new(word.example.as_deref(), &word.word)
  }

  /// Record a grade for the current word and move on.
  ///
  /// Only valid in flashcard mode. The returned review request must be sent
  /// by the caller; the session has already advanced regardless of its outcome.
  pub fn handle_grade(&mut self, grade: Grade) -> Result<GradeOutcome, StudyError> {
    self.ensure_active()?;
    if self.mode != DrillMode::Flashcard {
      return Err(StudyError::NotInFlashcardMode(self.mode.as_str()));
    }

    let item = &mut self.queue[self.index];
    if item.grade.is_some() {
      return Err(StudyError::AlreadyGraded);
    }
    item.grade = Some(grade);
    item.completed.insert(DrillMode::Flashcard);

    let review = item.card.as_ref().map(|card| ReviewRequest {
      card_id: card.id.clone(),
      grade,
    });

    let transition = self.advance();
    Ok(GradeOutcome { review, transition })
  }

  /// Complete the current drill without grading ("already known")
  pub fn handle_skip(&mut self) -> Result<Transition, StudyError> {
    self.ensure_active()?;
    Ok(self.complete_current())
  }

  /// Complete one of the non-flashcard drills
  pub fn handle_complete_mode(&mut self) -> Result<Transition, StudyError> {
    self.ensure_active()?;
    match self.mode {
      DrillMode::Flashcard => Err(StudyError::GradeRequired),
      DrillMode::MultipleChoice if !self.drill.revealed => Err(StudyError::AnswerNotRevealed),
      _ => Ok(self.complete_current()),
    }
  }

  /// Flip the flashcard or toggle the shown answer. Multiple choice reveals
  /// only through a selection.
  pub fn toggle_reveal(&mut self) -> Result<bool, StudyError> {
    self.ensure_active()?;
    match self.mode {
      DrillMode::Flashcard => self.drill.revealed = true,
      DrillMode::FillBlank | DrillMode::ListenWrite => self.drill.revealed = !self.drill.revealed,
      DrillMode::MultipleChoice => return Err(StudyError::WrongMode(self.mode.as_str())),
    }
    Ok(self.drill.revealed)
  }

  /// Store and check a typed answer (fill-blank and listen-write)
  pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerResult, StudyError> {
    self.ensure_active()?;
    if !matches!(self.mode, DrillMode::FillBlank | DrillMode::ListenWrite) {
      return Err(StudyError::WrongMode(self.mode.as_str()));
    }
    let result = check_answer(answer, &self.queue[self.index].word.word);
    self.drill.answer = answer.to_string();
    self.drill.check = Some(result);
    Ok(result)
  }

  /// Options of the current multiple choice drill, generating them on first use
  pub fn choices_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[Choice], StudyError> {
    self.ensure_active()?;
    if self.mode != DrillMode::MultipleChoice {
      return Err(StudyError::WrongMode(self.mode.as_str()));
    }
    if self.drill.choices.is_empty() {
      let words: Vec<Word> = self.queue.iter().map(|i| i.word.clone()).collect();
      self.drill.choices = generate_choices(&self.queue[self.index].word, &words, rng);
    }
    Ok(&self.drill.choices)
  }

  pub fn choices(&mut self) -> Result<&[Choice], StudyError> {
    self.choices_with(&mut rand::rng())
  }

  /// Select a multiple choice option. Returns whether it is the headword.
  pub fn choose(&mut self, index: usize) -> Result<bool, StudyError> {
    self.choices()?;
    let target = self.queue[self.index].word.word.clone();
    let choice = self
      .drill
      .choices
      .get(index)
      .filter(|c| !c.is_placeholder())
      .ok_or(StudyError::InvalidChoice(index))?;
    let correct = choice.matches(&target);
    self.drill.selected = Some(index);
    self.drill.revealed = true;
    Ok(correct)
  }

  fn ensure_active(&self) -> Result<(), StudyError> {
    if self.finished {
      Err(StudyError::SessionFinished)
    } else {
      Ok(())
    }
  }

  fn complete_current(&mut self) -> Transition {
    self.queue[self.index].completed.insert(self.mode);
    self.advance()
  }

  /// Mode-advance rule followed by the item-advance rule
  fn advance(&mut self) -> Transition {
    if let Some(mode) = next_mode(&self.queue[self.index]) {
      self.enter(mode);
      return Transition::Mode(mode);
    }

    if self.index + 1 < self.queue.len() {
      self.index += 1;
      self.enter(DrillMode::Flashcard);
      Transition::Item(self.index)
    } else {
      self.finished = true;
      self.drill = DrillState::default();
      Transition::Completed
    }
  }

  fn enter(&mut self, mode: DrillMode) {
    self.mode = mode;
    self.drill = DrillState::default();
  }
}
