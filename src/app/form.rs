//! Form controller - draft question, validation and the create lifecycle

use crate::constants::{ANSWER_COUNT, CREATE_FAILED_MESSAGE};
use crate::error::{ClientError, ValidationError};
use crate::messages::NetworkCommand;
use crate::models::{NewQuestion, Question};

/// What a create response meant for the form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Draft was reset; the caller reconciles the store and view
    Created(Question),
    /// Error recorded, draft kept
    Failed,
    /// Response for a disposed form or an id that is not pending
    Stale,
}

#[derive(Debug)]
pub struct FormController {
    draft_prompt: String,
    draft_answers: [String; ANSWER_COUNT],
    draft_correct_index: Option<usize>,
    submission_error: Option<String>,
    pending_submission: Option<u64>,
    live: bool,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        FormController {
            draft_prompt: String::new(),
            draft_answers: Default::default(),
            draft_correct_index: Some(0),
            submission_error: None,
            pending_submission: None,
            live: true,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.draft_prompt
    }

    pub fn answers(&self) -> &[String; ANSWER_COUNT] {
        &self.draft_answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.draft_answers.get(index).map(String::as_str)
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.draft_correct_index
    }

    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending_submission.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.draft_prompt = text.into();
    }

    /// Indices outside the answer slots are ignored
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.draft_answers.get_mut(index) {
            *slot = text.into();
        }
    }

    pub fn set_correct_index(&mut self, index: Option<usize>) {
        self.draft_correct_index = index;
    }

    /// Check the draft; on failure the error message is set
    pub fn validate(&mut self) -> Result<NewQuestion, ValidationError> {
        let blank = |s: &String| s.trim().is_empty();
        let index_ok = matches!(self.draft_correct_index, Some(i) if i < ANSWER_COUNT);

        if blank(&self.draft_prompt) || self.draft_answers.iter().any(blank) || !index_ok {
            let err = ValidationError::IncompleteFields;
            self.submission_error = Some(err.to_string());
            return Err(err);
        }

        Ok(NewQuestion {
            prompt: self.draft_prompt.clone(),
            answers: self.draft_answers.to_vec(),
            correct_index: self.draft_correct_index.unwrap_or_default(),
        })
    }

    /// Validate and build the create command for `request_id`.
    ///
    /// Returns `None` when the draft is invalid, a submission is already in
    /// flight, or the form has been disposed.
    pub fn submit(&mut self, request_id: u64) -> Option<NetworkCommand> {
        if !self.live || self.pending_submission.is_some() {
            return None;
        }
        let question = self.validate().ok()?;
        self.pending_submission = Some(request_id);
        tracing::debug!(request_id, "Submitting new question");
        Some(NetworkCommand::CreateQuestion {
            id: request_id,
            question,
        })
    }

    /// Apply the create response for `request_id`
    pub fn finish_submission(
        &mut self,
        request_id: u64,
        result: Result<Question, ClientError>,
    ) -> SubmissionOutcome {
        if !self.live || self.pending_submission != Some(request_id) {
            tracing::debug!(request_id, "Discarding stale create response");
            return SubmissionOutcome::Stale;
        }
        self.pending_submission = None;

        match result {
            Ok(question) => {
                self.reset();
                SubmissionOutcome::Created(question)
            }
            Err(error) => {
                tracing::warn!(request_id, %error, "Create question failed");
                self.submission_error = Some(String::from(CREATE_FAILED_MESSAGE));
                SubmissionOutcome::Failed
            }
        }
    }

    /// Mark the form dead, handing back any in-flight request id
    pub fn dispose(&mut self) -> Option<u64> {
        self.live = false;
        self.pending_submission.take()
    }

    fn reset(&mut self) {
        self.draft_prompt.clear();
        self.draft_answers = Default::default();
        self.draft_correct_index = Some(0);
        self.submission_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INCOMPLETE_FORM_MESSAGE;
    use crate::models::QuestionId;

    fn filled() -> FormController {
        let mut form = FormController::new();
        form.set_prompt("Test Prompt");
        for i in 0..ANSWER_COUNT {
            form.set_answer(i, format!("Answer {}", i + 1));
        }
        form.set_correct_index(Some(1));
        form
    }

    fn created(id: u64) -> Question {
        Question {
            id: QuestionId::Number(id),
            prompt: "Test Prompt".into(),
            answers: vec!["Answer 1".into(), "Answer 2".into(), "Answer 3".into(), "Answer 4".into()],
            correct_index: Some(1),
        }
    }

    #[test]
    fn test_new_form_defaults() {
        let form = FormController::new();
        assert_eq!(form.prompt(), "");
        assert_eq!(form.answers().len(), 4);
        assert_eq!(form.correct_index(), Some(0));
        assert!(form.submission_error().is_none());
    }

    #[test]
    fn test_empty_form_issues_no_request() {
        let mut form = FormController::new();
        assert!(form.submit(1).is_none());
        assert_eq!(form.submission_error(), Some(INCOMPLETE_FORM_MESSAGE));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_partially_filled_answers_fail_validation() {
        let mut form = FormController::new();
        form.set_prompt("Test Prompt");
        form.set_answer(0, "Answer 1");
        form.set_answer(1, "Answer 2");
        form.set_correct_index(Some(3));
        assert_eq!(form.validate(), Err(ValidationError::IncompleteFields));
        assert!(form.submit(1).is_none());
        assert_eq!(form.submission_error(), Some(INCOMPLETE_FORM_MESSAGE));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut form = filled();
        form.set_prompt("   ");
        assert!(form.submit(1).is_none());

        let mut form = filled();
        form.set_answer(2, "\t");
        assert!(form.submit(1).is_none());
    }

    #[test]
    fn test_invalid_correct_index_fails_validation() {
        let mut form = filled();
        form.set_correct_index(None);
        assert!(form.validate().is_err());
        form.set_correct_index(Some(ANSWER_COUNT));
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_set_answer_ignores_out_of_range() {
        let mut form = FormController::new();
        form.set_answer(ANSWER_COUNT, "nowhere");
        assert!(form.answers().iter().all(String::is_empty));
    }

    #[test]
    fn test_valid_submit_builds_create_command() {
        let mut form = filled();
        let cmd = form.submit(7).unwrap();
        match cmd {
            NetworkCommand::CreateQuestion { id, question } => {
                assert_eq!(id, 7);
                assert_eq!(question.prompt, "Test Prompt");
                assert_eq!(question.answers[3], "Answer 4");
                assert_eq!(question.correct_index, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(form.is_submitting());
        // No second request while the first is in flight
        assert!(form.submit(8).is_none());
    }

    #[test]
    fn test_success_resets_draft() {
        let mut form = filled();
        form.submit(1).unwrap();
        let outcome = form.finish_submission(1, Ok(created(5)));
        assert_eq!(outcome, SubmissionOutcome::Created(created(5)));
        assert_eq!(form.prompt(), "");
        assert!(form.answers().iter().all(String::is_empty));
        assert_eq!(form.correct_index(), Some(0));
        assert!(form.submission_error().is_none());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_failure_keeps_draft() {
        let mut form = filled();
        form.submit(1).unwrap();
        let outcome = form.finish_submission(1, Err(ClientError::Status { status: 500 }));
        assert_eq!(outcome, SubmissionOutcome::Failed);
        assert_eq!(form.submission_error(), Some(CREATE_FAILED_MESSAGE));
        assert_eq!(form.prompt(), "Test Prompt");
        assert_eq!(form.answer(0), Some("Answer 1"));
        // The user can resubmit explicitly
        assert!(form.submit(2).is_some());
    }

    #[test]
    fn test_responses_after_dispose_are_stale() {
        let mut form = filled();
        form.submit(3).unwrap();
        assert_eq!(form.dispose(), Some(3));
        assert!(!form.is_live());
        assert_eq!(form.finish_submission(3, Ok(created(1))), SubmissionOutcome::Stale);
        assert_eq!(form.prompt(), "Test Prompt");
        assert!(form.submit(4).is_none());
    }

    #[test]
    fn test_unknown_request_id_is_stale() {
        let mut form = filled();
        form.submit(3).unwrap();
        assert_eq!(form.finish_submission(99, Ok(created(1))), SubmissionOutcome::Stale);
        assert!(form.is_submitting());
    }
}
