//! The active question set and its read cursor. Pure data, no I/O.

use serde::{Deserialize, Serialize};

use crate::error::InvalidDataError;
use crate::question::{validate_set, Question};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionStore {
    questions: Vec<Question>,
    cursor: usize,
}

impl QuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set and rewind the cursor.
    ///
    /// The input is validated before anything is replaced, so on error the
    /// store keeps its previous contents and cursor.
    pub fn load(&mut self, records: Vec<Question>) -> Result<(), InvalidDataError> {
        validate_set(&records)?;
        self.questions = records;
        self.cursor = 0;
        Ok(())
    }

    /// Question at the cursor, `None` once the cursor has passed the end.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Move the cursor forward (never past `len`) and return the new current.
    pub fn advance(&mut self) -> Option<&Question> {
        self.cursor = (self.cursor + 1).min(self.questions.len());
        self.current()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
