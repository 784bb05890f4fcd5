//! Question store - client-side copy of the backend collection, no I/O

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::constants::LOAD_FAILED_MESSAGE;
use crate::error::{ClientError, StoreError};
use crate::models::{Question, QuestionId};

/// Ordered questions, unique by id, in backend order
#[derive(Debug, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
    load_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
}

impl QuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Apply the outcome of a full load.
    ///
    /// Success replaces everything; failure only records the error.
    pub fn finish_load(&mut self, result: Result<Vec<Question>, ClientError>) {
        match result {
            Ok(questions) => {
                let mut seen = HashSet::with_capacity(questions.len());
                let mut unique = Vec::with_capacity(questions.len());
                for question in questions {
                    if seen.insert(question.id.clone()) {
                        unique.push(question);
                    } else {
                        tracing::warn!(id = %question.id, "Duplicate question id in load response");
                    }
                }
                self.questions = unique;
                self.load_error = None;
                self.loaded_at = Some(Utc::now());
            }
            Err(error) => {
                tracing::warn!(%error, "Question load failed");
                self.load_error = Some(format!("{}: {}", LOAD_FAILED_MESSAGE, error));
            }
        }
    }

    /// Insert a server-returned record, replacing one with the same id
    pub fn insert_from_server(&mut self, question: Question) {
        match self.position(&question.id) {
            Some(i) => self.questions[i] = question,
            None => self.questions.push(question),
        }
    }

    /// Replace the record for `id` with the server's representation
    pub fn apply_update(&mut self, id: &QuestionId, updated: Question) -> Result<(), StoreError> {
        let i = self
            .position(id)
            .ok_or_else(|| StoreError::UnknownId(id.clone()))?;
        if &updated.id != id {
            tracing::warn!(expected = %id, got = %updated.id, "Update response carries a different id");
        }
        self.questions[i] = updated;
        Ok(())
    }

    /// Remove the record for `id`; absent ids are a no-op
    pub fn remove(&mut self, id: &QuestionId) -> Option<Question> {
        self.position(id).map(|i| self.questions.remove(i))
    }

    /// Set the correct index locally, returning the previous value
    pub fn patch_correct_index(
        &mut self,
        id: &QuestionId,
        index: Option<usize>,
    ) -> Result<Option<usize>, StoreError> {
        let i = self
            .position(id)
            .ok_or_else(|| StoreError::UnknownId(id.clone()))?;
        Ok(std::mem::replace(&mut self.questions[i].correct_index, index))
    }

    fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }
}
