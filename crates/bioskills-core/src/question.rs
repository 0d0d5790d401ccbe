use serde::{Deserialize, Serialize};

use crate::error::InvalidDataError;

/// A single multiple-choice question as stored in a question-set resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
            explanation: explanation.into(),
        }
    }

    /// Check the record's shape. `index` is the record's position in its set
    /// and only feeds the error message.
    pub fn validate(&self, index: usize) -> Result<(), InvalidDataError> {
        if self.question.trim().is_empty() {
            return Err(InvalidDataError::EmptyPrompt { index });
        }
        if self.options.len() < 2 {
            return Err(InvalidDataError::TooFewOptions {
                index,
                count: self.options.len(),
            });
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].contains(option) {
                return Err(InvalidDataError::DuplicateOption {
                    index,
                    option: option.clone(),
                });
            }
        }
        if !self.options.contains(&self.answer) {
            return Err(InvalidDataError::AnswerNotInOptions {
                index,
                answer: self.answer.clone(),
            });
        }
        Ok(())
    }

    /// Exact text comparison, no trimming or case folding.
    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }
}

/// Validate a whole set, stopping at the first bad record.
pub fn validate_set(records: &[Question]) -> Result<(), InvalidDataError> {
    if records.is_empty() {
        return Err(InvalidDataError::EmptySet);
    }
    records
        .iter()
        .enumerate()
        .try_for_each(|(i, q)| q.validate(i))
}
