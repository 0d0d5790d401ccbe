//! # Bioskills Battle Core Library
//!
//! This library provides the core logic for the Bioskills Battle quiz: a
//! timed multiple-choice game over science question sets. Front ends (the
//! `bioskills` CLI today) are thin layers that feed user input into a
//! [`QuizSession`] and render the [`Event`]s it produces.
//!
//! ## Architecture
//!
//! - **Question Store**: the active question set and its read cursor
//! - **Quiz Engine**: a tick-driven state machine owning score and countdown
//! - **Timer**: a cancellable one-second ticker on the tokio runtime
//! - **Loader**: fetches and parses question-set JSON from disk or HTTP
//! - **Session**: the presentation adapter tying the above to a [`Renderer`]
//!
//! ## Key Components
//!
//! - [`QuizEngine`]: Core quiz state machine
//! - [`QuizSession`]: Input/tick routing and rendering
//! - [`SetLoader`]: Question-set retrieval
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod question;
pub mod quiz;
pub mod session;
pub mod store;

pub use catalog::{Article, Catalog, SetEntry, Technique};
pub use config::{Config, QuizConfig, SetsConfig};
pub use error::{ConfigError, CoreError, InvalidDataError, LoadError, NoQuestionError};
pub use events::Event;
pub use loader::{parse_set, MemorySource, QuestionSource, SetLoader};
pub use question::Question;
pub use quiz::{
    Advance, AnswerFeedback, QuestionTimer, QuestionView, QuizEngine, QuizState, QuizSummary,
    TickOutcome,
};
pub use session::{Flow, QuizSession, Renderer, UserInput};
pub use store::QuestionStore;
