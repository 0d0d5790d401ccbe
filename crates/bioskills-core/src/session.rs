//! Presentation adapter.
//!
//! `QuizSession` is the only place that talks to a rendering surface. It
//! routes user input and timer ticks into the engine and hands every
//! resulting change to a [`Renderer`] as an [`Event`].

use chrono::Utc;
use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::config::QuizConfig;
use crate::error::CoreError;
use crate::events::Event;
use crate::loader::QuestionSource;
use crate::quiz::{Advance, QuestionTimer, QuizEngine, TickOutcome};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load questions";
pub const NO_QUESTION_MESSAGE: &str = "Could not display question.";

/// A rendering surface.
pub trait Renderer {
    fn render(&mut self, event: &Event);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, event: &Event) {
        (**self).render(event);
    }
}

/// Collects events in memory.
impl Renderer for Vec<Event> {
    fn render(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Pick an option by its text.
    Select(String),
    /// Pick an option by its 1-based position.
    Choose(usize),
    Next,
    SwitchSet(String),
    Restart,
    Quit,
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Wakeup {
    Tick,
    Input(Option<UserInput>),
}

pub struct QuizSession<S, R> {
    engine: QuizEngine,
    timer: QuestionTimer,
    source: S,
    renderer: R,
    catalog: Catalog,
    settings: QuizConfig,
    default_set: String,
    resource: Option<String>,
}

impl<S: QuestionSource, R: Renderer> QuizSession<S, R> {
    pub fn new(
        source: S,
        renderer: R,
        settings: QuizConfig,
        default_set: impl Into<String>,
    ) -> Self {
        Self {
            engine: QuizEngine::new(),
            timer: QuestionTimer::default(),
            source,
            renderer,
            catalog: Catalog::builtin(),
            settings,
            default_set: default_set.into(),
            resource: None,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_timer(mut self, timer: QuestionTimer) -> Self {
        self.timer = timer;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Resource name of the set currently being played.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load a set and show its first question.
    ///
    /// A failed fetch or a set that fails validation is rendered as
    /// `LoadFailed` and leaves the running quiz exactly as it was, timer
    /// included. The error is also returned for callers that care.
    pub async fn switch_set(&mut self, key: &str) -> Result<(), CoreError> {
        let resource = self.catalog.resource_for(key).to_string();
        let budget = self
            .settings
            .budget_for(self.catalog.is_calculation(&resource));

        let outcome = match self.source.fetch_set(&resource).await {
            Ok(records) => self
                .engine
                .switch_set(records, budget)
                .map_err(CoreError::from),
            Err(e) => Err(CoreError::from(e)),
        };

        if let Err(e) = outcome {
            tracing::warn!(%resource, error = %e, "question set not loaded");
            self.renderer.render(&Event::LoadFailed {
                resource,
                message: LOAD_FAILED_MESSAGE.to_string(),
                reason: e.to_string(),
                at: Utc::now(),
            });
            return Err(e);
        }

        self.timer.stop();
        tracing::debug!(%resource, total = self.engine.total(), budget, "question set loaded");
        self.renderer.render(&Event::SetLoaded {
            resource: resource.clone(),
            total: self.engine.total(),
            time_budget: self.engine.time_budget(),
            at: Utc::now(),
        });
        self.resource = Some(resource);
        self.show_question();
        Ok(())
    }

    /// Start the current question and its countdown.
    pub fn show_question(&mut self) {
        match self.engine.start_question() {
            Ok(view) => {
                self.timer.start();
                self.renderer.render(&Event::QuestionStarted {
                    number: view.number,
                    total: view.total,
                    prompt: view.prompt,
                    options: view.options,
                    time_budget: view.time_budget,
                    score: self.engine.score(),
                    at: Utc::now(),
                });
            }
            Err(e) => {
                self.timer.stop();
                tracing::warn!(error = %e, "no question to show");
                self.renderer.render(&Event::Error {
                    message: NO_QUESTION_MESSAGE.to_string(),
                    at: Utc::now(),
                });
            }
        }
    }

    /// Handle one timer tick.
    pub fn on_tick(&mut self) {
        match self.engine.tick() {
            TickOutcome::Running { remaining } => {
                self.renderer.render(&Event::TimerTicked {
                    remaining,
                    warning: remaining <= self.settings.warning_threshold,
                    at: Utc::now(),
                });
            }
            TickOutcome::TimedOut {
                answer,
                explanation,
            } => {
                self.timer.stop();
                self.renderer.render(&Event::TimerTicked {
                    remaining: 0,
                    warning: true,
                    at: Utc::now(),
                });
                self.renderer.render(&Event::TimedOut {
                    answer,
                    explanation,
                    score: self.engine.score(),
                    at: Utc::now(),
                });
                if self.settings.auto_advance {
                    self.next();
                }
            }
            TickOutcome::Ignored => self.timer.stop(),
        }
    }

    /// Answer the current question by option text. Text that is not one of
    /// the current options is ignored.
    pub fn select(&mut self, option: &str) {
        let offered = self
            .engine
            .current_question()
            .is_some_and(|q| q.options.iter().any(|o| o == option));
        if !offered {
            tracing::debug!(option, "no such option");
            return;
        }
        let Some(feedback) = self.engine.submit_answer(option) else {
            tracing::debug!(option, state = ?self.engine.state(), "answer ignored");
            return;
        };
        self.timer.stop();
        self.renderer.render(&Event::AnswerSubmitted {
            selected: feedback.selected,
            correct: feedback.correct,
            answer: feedback.answer,
            explanation: feedback.explanation,
            score: feedback.score,
            at: Utc::now(),
        });
    }

    /// Answer the current question by 1-based option number.
    ///
    /// A number that is not a valid position but is itself an option's text
    /// (`50` among `["50", "100"]`) selects that option.
    pub fn choose(&mut self, number: usize) {
        let option = self.engine.current_question().and_then(|q| {
            number
                .checked_sub(1)
                .and_then(|i| q.options.get(i))
                .or_else(|| {
                    let text = number.to_string();
                    q.options.iter().find(|o| **o == text)
                })
                .cloned()
        });
        match option {
            Some(option) => self.select(&option),
            None => tracing::debug!(number, "no such option"),
        }
    }

    /// Move on to the next question or the final results.
    pub fn next(&mut self) {
        self.timer.stop();
        match self.engine.advance() {
            Advance::Next(_) => self.show_question(),
            Advance::Finished(summary) => {
                self.renderer.render(&Event::QuizFinished {
                    score: summary.score,
                    total: summary.total,
                    at: Utc::now(),
                });
            }
        }
    }

    /// Start over from the configured default set.
    pub async fn restart(&mut self) -> Result<(), CoreError> {
        self.timer.stop();
        let default_set = self.default_set.clone();
        self.switch_set(&default_set).await
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Apply one input. Load failures have already been rendered, so they
    /// do not end the session.
    pub async fn handle_input(&mut self, input: UserInput) -> Flow {
        match input {
            UserInput::Select(option) => self.select(&option),
            UserInput::Choose(number) => self.choose(number),
            UserInput::Next => self.next(),
            UserInput::SwitchSet(resource) => {
                let _ = self.switch_set(&resource).await;
            }
            UserInput::Restart => {
                let _ = self.restart().await;
            }
            UserInput::Quit => {
                self.stop();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Drive the session until `Quit` or until the input channel closes.
    pub async fn run(&mut self, inputs: &mut mpsc::UnboundedReceiver<UserInput>) {
        loop {
            let wakeup = tokio::select! {
                Some(_) = self.timer.recv() => Wakeup::Tick,
                input = inputs.recv() => Wakeup::Input(input),
            };

            match wakeup {
                Wakeup::Tick => self.on_tick(),
                Wakeup::Input(Some(input)) => {
                    if self.handle_input(input).await == Flow::Quit {
                        break;
                    }
                }
                Wakeup::Input(None) => break,
            }
        }
        self.stop();
    }
}
