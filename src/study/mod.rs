pub mod answer;
pub mod blank;
pub mod choices;
pub mod session;

pub use answer::{check_answer, AnswerResult};
pub use blank::BlankedExample;
pub use choices::{generate_choices, Choice};
pub use session::{
  next_mode, DrillState, GradeOutcome, ModeStatus, ReviewRequest, StudyError, StudyQueueItem,
  StudySession, Transition,
};
