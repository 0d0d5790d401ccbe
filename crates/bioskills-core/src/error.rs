//! Core error types for bioskills-core.
//!
//! Every failure the quiz can hit is recoverable: the session turns these
//! into rendered events instead of tearing the quiz down.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bioskills-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Question-set loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Malformed question records
    #[error("Invalid question data: {0}")]
    InvalidData(#[from] InvalidDataError),

    /// No question to show
    #[error(transparent)]
    NoQuestion(#[from] NoQuestionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to retrieve or parse a question-set resource.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Resource name was empty
    #[error("question set name is empty")]
    EmptyResourceName,

    /// Resource name could not be turned into a URL
    #[error("invalid resource location '{resource}': {source}")]
    InvalidLocation {
        resource: String,
        #[source]
        source: url::ParseError,
    },

    /// URL scheme or form the loader cannot read
    #[error("unsupported resource location '{resource}'")]
    UnsupportedLocation { resource: String },

    /// Reading a local file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network request failed before a response arrived
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("network response was not ok for {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Payload is not JSON at all
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Payload is JSON but not an array
    #[error("loaded data is not a question array (found {found})")]
    NotAnArray { found: &'static str },

    /// Array entries do not have the question shape
    #[error("question record has the wrong shape: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Question records that parsed but fail validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDataError {
    /// The set contains no questions
    #[error("question set is empty")]
    EmptySet,

    /// Question text is blank
    #[error("question {index} has no question text")]
    EmptyPrompt { index: usize },

    /// Fewer than two options
    #[error("question {index} has {count} option(s), at least 2 are required")]
    TooFewOptions { index: usize, count: usize },

    /// Two options share the same text
    #[error("question {index} lists option '{option}' more than once")]
    DuplicateOption { index: usize, option: String },

    /// Answer does not match any option
    #[error("question {index} has answer '{answer}' which is not one of its options")]
    AnswerNotInOptions { index: usize, answer: String },
}

/// Attempt to show a question when none is current.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no question available at position {index} (set has {total})")]
pub struct NoQuestionError {
    pub index: usize,
    pub total: usize,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be prepared
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
