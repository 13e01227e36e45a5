pub mod band;
pub mod deck;
pub mod grade;
pub mod listening;
pub mod mode;
pub mod note;
pub mod reading;
pub mod speaking;
pub mod user;
pub mod word;
pub mod writing;

pub use band::{band_gap, format_band, parse_band};
pub use deck::{
  BulkImportResult, DashboardSummary, Deck, DeckUpdate, HeatmapDay, LeaderboardEntry, NewDeck, PublicDeck, WeakSkill,
};
pub use grade::{Grade, GradeButton, GRADE_BUTTONS};
pub use listening::{DictationAttempt, DictationResult, ListeningSentence, ListeningTest};
pub use mock_test::{MockResult, MockSubmission, MockTest, SectionScores};
pub use mode::{DrillMode, ModeSet};
pub use note::{NoteBlock, NoteDocument, NoteSave, DEFAULT_NOTE_TITLE};
pub use reading::{AnswerFormat, QuestionInput, ReadingAttempt, ReadingQuestion, ReadingResult, ReadingTest, ANSWER_SEPARATOR};
pub use speaking::{SpeakingAttempt, SpeakingPrompt, SpeakingScore};
pub use user::{TokenResponse, User};
pub use word::{Flashcard, NewWord, Word};
pub use writing::{
  clean_prompt_description, EssaySubmission, ImprovedChange, LexicalSuggestion, TaskType, WeakSentence, WritingFeedback,
  WritingPrompt,
};
