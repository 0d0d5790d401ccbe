mod engine;
mod timer;

pub use engine::{
    Advance, AnswerFeedback, QuestionView, QuizEngine, QuizState, QuizSummary, TickOutcome,
};
pub use timer::{QuestionTimer, Tick};
