//! Quiz engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no timer of its own:
//! the caller invokes `tick()` once per elapsed second while a question is
//! running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> TimerRunning -> (Answered | TimedOut) -> advance() -> Idle | Finished
//! ```
//!
//! `Answered` and `TimedOut` both lock the question: further answers and
//! ticks are ignored until `advance()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = QuizEngine::new();
//! engine.switch_set(questions, 20)?;
//! let view = engine.start_question()?;
//! // Once per second:
//! engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidDataError, NoQuestionError};
use crate::events::Event;
use crate::question::Question;
use crate::store::QuestionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    /// A question is current but its timer has not been started.
    Idle,
    TimerRunning,
    Answered,
    TimedOut,
    /// The cursor has passed the last question.
    Finished,
}

/// What the renderer needs to show a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// 1-based position in the set.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub time_budget: u32,
}

impl QuestionView {
    fn from_question(question: &Question, index: usize, total: usize, time_budget: u32) -> Self {
        Self {
            number: index + 1,
            total,
            prompt: question.question.clone(),
            options: question.options.clone(),
            time_budget,
        }
    }
}

/// Result of a submission that was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub selected: String,
    pub answer: String,
    pub explanation: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown continues.
    Running { remaining: u32 },
    /// This tick exhausted the budget. Fires once per question.
    TimedOut { answer: String, explanation: String },
    /// No question was running.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: u32,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A next question exists; call `start_question()` to run it.
    Next(QuestionView),
    Finished(QuizSummary),
}

/// Core quiz engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizEngine {
    store: QuestionStore,
    state: QuizState,
    score: u32,
    /// Seconds given to each question.
    time_budget: u32,
    /// Seconds left on the current question.
    time_remaining: u32,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEngine {
    pub const DEFAULT_BUDGET_SECS: u32 = 20;

    /// Create an engine with an empty store.
    pub fn new() -> Self {
        Self {
            store: QuestionStore::new(),
            state: QuizState::Idle,
            score: 0,
            time_budget: Self::DEFAULT_BUDGET_SECS,
            time_remaining: Self::DEFAULT_BUDGET_SECS,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Cursor position, in `[0, total]`.
    pub fn index(&self) -> usize {
        self.store.cursor()
    }

    pub fn total(&self) -> usize {
        self.store.len()
    }

    pub fn time_budget(&self) -> u32 {
        self.time_budget
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Whether the current question refuses further answers.
    pub fn is_locked(&self) -> bool {
        matches!(self.state, QuizState::Answered | QuizState::TimedOut)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.store.current()
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            total: self.total(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            index: self.index(),
            total: self.total(),
            score: self.score,
            time_remaining: self.time_remaining,
            time_budget: self.time_budget,
            prompt: self.current_question().map(|q| q.question.clone()),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Zero the score, rewind to the first question and set the budget.
    /// A zero budget is clamped to one second.
    pub fn reset(&mut self, budget_secs: u32) {
        self.time_budget = budget_secs.max(1);
        self.time_remaining = self.time_budget;
        self.score = 0;
        self.state = QuizState::Idle;
        self.store.rewind();
    }

    /// Load a new set and reset. On invalid data nothing changes.
    pub fn switch_set(
        &mut self,
        records: Vec<Question>,
        budget_secs: u32,
    ) -> Result<(), InvalidDataError> {
        self.store.load(records)?;
        self.reset(budget_secs);
        Ok(())
    }

    /// Begin the countdown for the current question.
    pub fn start_question(&mut self) -> Result<QuestionView, NoQuestionError> {
        let index = self.store.cursor();
        let total = self.store.len();
        let Some(question) = self.store.current() else {
            return Err(NoQuestionError { index, total });
        };
        let view = QuestionView::from_question(question, index, total, self.time_budget);
        self.time_remaining = self.time_budget;
        self.state = QuizState::TimerRunning;
        Ok(view)
    }

    /// Count down one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != QuizState::TimerRunning {
            return TickOutcome::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return TickOutcome::Running {
                remaining: self.time_remaining,
            };
        }

        self.state = QuizState::TimedOut;
        match self.store.current() {
            Some(q) => TickOutcome::TimedOut {
                answer: q.answer.clone(),
                explanation: q.explanation.clone(),
            },
            None => TickOutcome::Ignored,
        }
    }

    /// Answer the current question. Returns `None` when the question is not
    /// accepting answers (not started, already answered, or timed out).
    pub fn submit_answer(&mut self, selected: &str) -> Option<AnswerFeedback> {
        if self.state != QuizState::TimerRunning || self.time_remaining == 0 {
            return None;
        }
        let question = self.store.current()?;
        let correct = question.is_correct(selected);
        let answer = question.answer.clone();
        let explanation = question.explanation.clone();

        if correct {
            self.score += 1;
        }
        self.state = QuizState::Answered;
        Some(AnswerFeedback {
            correct,
            selected: selected.to_string(),
            answer,
            explanation,
            score: self.score,
        })
    }

    /// Move to the next question, or finish. Idempotent once finished.
    pub fn advance(&mut self) -> Advance {
        if self.state == QuizState::Finished {
            return Advance::Finished(self.summary());
        }
        self.store.advance();
        let next = self.store.current().map(|q| {
            QuestionView::from_question(q, self.store.cursor(), self.store.len(), self.time_budget)
        });

        match next {
            Some(view) => {
                self.state = QuizState::Idle;
                self.time_remaining = self.time_budget;
                Advance::Next(view)
            }
            None => {
                self.state = QuizState::Finished;
                self.time_remaining = 0;
                Advance::Finished(self.summary())
            }
        }
    }
}
