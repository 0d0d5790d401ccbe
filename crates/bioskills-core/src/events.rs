use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::QuizState;

/// Every change the session reports to a renderer is an Event.
/// Terminal renderers format them; the JSON renderer prints them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SetLoaded {
        resource: String,
        total: usize,
        time_budget: u32,
        at: DateTime<Utc>,
    },
    /// A set could not be fetched or failed validation. The previous quiz,
    /// if any, is still active.
    LoadFailed {
        resource: String,
        message: String,
        reason: String,
        at: DateTime<Utc>,
    },
    QuestionStarted {
        number: usize,
        total: usize,
        prompt: String,
        options: Vec<String>,
        time_budget: u32,
        score: u32,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining: u32,
        /// Remaining time is at or below the warning threshold.
        warning: bool,
        at: DateTime<Utc>,
    },
    AnswerSubmitted {
        selected: String,
        correct: bool,
        answer: String,
        explanation: String,
        score: u32,
        at: DateTime<Utc>,
    },
    TimedOut {
        answer: String,
        explanation: String,
        score: u32,
        at: DateTime<Utc>,
    },
    QuizFinished {
        score: u32,
        total: usize,
        at: DateTime<Utc>,
    },
    Error {
        message: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: QuizState,
        index: usize,
        total: usize,
        score: u32,
        time_remaining: u32,
        time_budget: u32,
        prompt: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Serialized `type` tag, handy for logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SetLoaded { .. } => "set_loaded",
            Event::LoadFailed { .. } => "load_failed",
            Event::QuestionStarted { .. } => "question_started",
            Event::TimerTicked { .. } => "timer_ticked",
            Event::AnswerSubmitted { .. } => "answer_submitted",
            Event::TimedOut { .. } => "timed_out",
            Event::QuizFinished { .. } => "quiz_finished",
            Event::Error { .. } => "error",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
