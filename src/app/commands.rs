//! Command handlers - business logic for processing UI events and responses

use crate::app::form::{FormController, SubmissionOutcome};
use crate::app::state::{AppState, IndexSync, PendingMutation};
use crate::app::view::View;
use crate::constants::{ANSWER_COUNT, DELETE_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE};
use crate::error::ClientError;
use crate::messages::ui_events::{FormField, InputMode};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{QuestionId, QuestionPatch};

impl AppState {
    // ========================
    // Screens
    // ========================

    /// Switch screens, mounting or disposing the form as needed
    pub fn switch_view(&mut self, view: View) -> Vec<NetworkCommand> {
        let mut commands = Vec::new();
        let Some((from, to)) = self.views.switch_to(view) else {
            return commands;
        };
        self.input_mode = InputMode::Normal;

        if from == View::Form {
            if let Some(pending) = self.form.dispose() {
                // The create may still land server-side
                tracing::info!(request_id = pending, "Form left with submission in flight");
                commands.push(NetworkCommand::CancelRequest(pending));
                commands.push(self.load_questions());
            }
        }
        if to == View::Form {
            self.form = FormController::new();
            self.active_field = FormField::Prompt;
            self.cursor_position = 0;
        }
        commands
    }

    // ========================
    // List navigation
    // ========================

    pub fn next_question(&mut self) {
        if !self.store.is_empty() {
            self.selected_question = (self.selected_question + 1) % self.store.len();
        }
    }

    pub fn prev_question(&mut self) {
        if !self.store.is_empty() {
            self.selected_question = self
                .selected_question
                .checked_sub(1)
                .unwrap_or(self.store.len() - 1);
        }
    }

    // ========================
    // Form field focus
    // ========================

    pub fn next_field(&mut self) {
        self.focus_field(self.active_field.next());
    }

    pub fn prev_field(&mut self) {
        self.focus_field(self.active_field.prev());
    }

    fn focus_field(&mut self, field: FormField) {
        self.active_field = field;
        if !field.is_text() {
            self.input_mode = InputMode::Normal;
        }
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.view() == View::Form && self.active_field.is_text() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let mut text = self.current_input().to_string();
        let cursor_pos = self.cursor_position.min(text.len());
        text.insert(cursor_pos, c);
        self.set_current_input(text);
        self.cursor_position = cursor_pos + c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let mut text = self.current_input().to_string();
        let cursor_pos = self.cursor_position.min(text.len());
        let prev_pos = text[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        text.remove(prev_pos);
        self.set_current_input(text);
        self.cursor_position = prev_pos;
    }

    // ========================
    // Correct-answer selector
    // ========================

    /// Step the selector of the list item or the form, wrapping around
    pub fn step_correct_answer(&mut self, forward: bool) -> Option<NetworkCommand> {
        match self.view() {
            View::Form => {
                let len = ANSWER_COUNT;
                let current = self.form.correct_index().filter(|i| *i < len).unwrap_or(0);
                self.form.set_correct_index(Some(step(current, len, forward)));
                None
            }
            View::List => {
                let question = self.store.questions().get(self.selected_question)?;
                let len = question.answers.len();
                if len == 0 {
                    return None;
                }
                let next = step(question.safe_correct_index(), len, forward);
                let id = question.id.clone();
                self.update_correct_index(&id, next)
            }
        }
    }

    // ========================
    // Requests
    // ========================

    /// Start a full reload; newer loads supersede older ones
    pub fn load_questions(&mut self) -> NetworkCommand {
        let id = self.next_id();
        self.pending_load = Some(id);
        NetworkCommand::FetchQuestions { id }
    }

    pub fn submit_form(&mut self) -> Option<NetworkCommand> {
        if self.view() != View::Form {
            return None;
        }
        self.stop_editing();
        let id = self.next_id();
        self.form.submit(id)
    }

    pub fn delete_selected(&mut self) -> Option<NetworkCommand> {
        let id = self.selected_id()?;
        self.delete_question(&id)
    }

    /// Issue a DELETE; the record is removed once the server acknowledges
    pub fn delete_question(&mut self, question_id: &QuestionId) -> Option<NetworkCommand> {
        if self.store.get(question_id).is_none() {
            tracing::warn!(id = %question_id, "Delete requested for question not in store");
            return None;
        }
        let already_pending = self.pending_mutations.values().any(|m| {
            matches!(m, PendingMutation::Delete { question_id: pending } if pending == question_id)
        });
        if already_pending {
            tracing::debug!(id = %question_id, "Delete already in flight");
            return None;
        }
        let id = self.next_id();
        self.pending_mutations.insert(
            id,
            PendingMutation::Delete {
                question_id: question_id.clone(),
            },
        );
        Some(NetworkCommand::DeleteQuestion {
            id,
            question_id: question_id.clone(),
        })
    }

    /// Issue a PATCH of `correctIndex`, showing the new value right away
    pub fn update_correct_index(
        &mut self,
        question_id: &QuestionId,
        new_index: usize,
    ) -> Option<NetworkCommand> {
        let Some(question) = self.store.get(question_id) else {
            tracing::warn!(id = %question_id, "Update requested for question not in store");
            return None;
        };
        if !question.is_valid_index(new_index) {
            tracing::warn!(id = %question_id, new_index, "Correct index out of range");
            return None;
        }
        let previous = self
            .store
            .patch_correct_index(question_id, Some(new_index))
            .ok()?;

        let id = self.next_id();
        let sync = self
            .index_sync
            .entry(question_id.clone())
            .or_insert(IndexSync {
                acknowledged: previous,
                latest: None,
                in_flight: 0,
            });
        sync.latest = Some(id);
        sync.in_flight += 1;
        self.pending_mutations.insert(
            id,
            PendingMutation::CorrectIndex {
                question_id: question_id.clone(),
                requested: new_index,
            },
        );
        Some(NetworkCommand::UpdateQuestion {
            id,
            question_id: question_id.clone(),
            patch: QuestionPatch::correct_index(new_index),
        })
    }

    // ========================
    // Response handling
    // ========================

    /// Reconcile state with a network response, returning follow-up commands
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        let mut commands = Vec::new();

        match response {
            NetworkResponse::QuestionsLoaded { id, questions } => {
                if self.take_pending_load(id) {
                    self.store.finish_load(Ok(questions));
                    self.reapply_pending_indexes();
                    self.clamp_selection();
                }
            }
            NetworkResponse::QuestionCreated { id, question } => {
                match self.form.finish_submission(id, Ok(question)) {
                    SubmissionOutcome::Created(question) => {
                        tracing::info!(id = %question.id, "Question created");
                        let created_id = question.id.clone();
                        self.store.insert_from_server(question);
                        if let Some(pos) =
                            self.store.questions().iter().position(|q| q.id == created_id)
                        {
                            self.selected_question = pos;
                        }
                        commands.extend(self.switch_view(View::List));
                        commands.push(self.load_questions());
                    }
                    SubmissionOutcome::Failed | SubmissionOutcome::Stale => {}
                }
            }
            NetworkResponse::QuestionUpdated { id, question } => {
                if let Some(PendingMutation::CorrectIndex { question_id, .. }) =
                    self.take_mutation(id)
                {
                    let acknowledged = question.correct_index;
                    match self.store.apply_update(&question_id, question) {
                        Ok(()) => self.list_error = None,
                        Err(err) => tracing::warn!(%err, "Update response for unknown question"),
                    }
                    self.settle_correct_index(id, &question_id, Some(acknowledged));
                }
            }
            NetworkResponse::QuestionDeleted { id, question_id } => {
                if let Some(PendingMutation::Delete { .. }) = self.take_mutation(id) {
                    if self.store.remove(&question_id).is_none() {
                        tracing::warn!(id = %question_id, "Deleted question was already gone");
                    }
                    self.list_error = None;
                    self.clamp_selection();
                }
            }
            NetworkResponse::Failed { id, error } => self.handle_failure(id, Some(error)),
            NetworkResponse::Cancelled { id } => self.handle_failure(id, None),
        }

        commands
    }

    /// Route a failed or cancelled request to whoever issued it
    fn handle_failure(&mut self, id: u64, error: Option<ClientError>) {
        if self.take_pending_load(id) {
            if let Some(error) = error {
                self.store.finish_load(Err(error));
            }
            return;
        }

        match self.take_mutation(id) {
            Some(PendingMutation::CorrectIndex { question_id, .. }) => {
                self.settle_correct_index(id, &question_id, None);
                if let Some(error) = error {
                    tracing::warn!(id = %question_id, %error, "Update question failed");
                    self.list_error = Some(String::from(UPDATE_FAILED_MESSAGE));
                }
            }
            Some(PendingMutation::Delete { question_id }) => {
                if let Some(error) = error {
                    tracing::warn!(id = %question_id, %error, "Delete question failed");
                    self.list_error = Some(String::from(DELETE_FAILED_MESSAGE));
                }
            }
            None => {
                if let Some(error) = error {
                    self.form.finish_submission(id, Err(error));
                }
            }
        }
    }

    /// Close out a correct-index request and put the store on the value it
    /// should show: the newest request still in flight, else the last
    /// acknowledged one
    fn settle_correct_index(
        &mut self,
        id: u64,
        question_id: &QuestionId,
        acknowledged: Option<Option<usize>>,
    ) {
        let Some(sync) = self.index_sync.get_mut(question_id) else {
            return;
        };
        if let Some(value) = acknowledged {
            sync.acknowledged = value;
        }
        if sync.latest == Some(id) {
            sync.latest = None;
        }
        sync.in_flight = sync.in_flight.saturating_sub(1);

        let shown = match sync.latest.and_then(|latest| self.pending_mutations.get(&latest)) {
            Some(PendingMutation::CorrectIndex { requested, .. }) => Some(*requested),
            _ => sync.acknowledged,
        };
        if sync.in_flight == 0 {
            self.index_sync.remove(question_id);
        }
        if let Err(err) = self.store.patch_correct_index(question_id, shown) {
            tracing::warn!(%err, "Could not reconcile correct index");
        }
    }

    /// After a reload the loaded values are the acknowledged ones; requests
    /// still in flight keep showing what the user picked
    fn reapply_pending_indexes(&mut self) {
        for (question_id, sync) in self.index_sync.iter_mut() {
            let Some(question) = self.store.get(question_id) else {
                continue;
            };
            sync.acknowledged = question.correct_index;
            let requested = match sync.latest.and_then(|latest| self.pending_mutations.get(&latest)) {
                Some(PendingMutation::CorrectIndex { requested, .. }) => *requested,
                _ => continue,
            };
            let _ = self.store.patch_correct_index(question_id, Some(requested));
        }
    }

    fn take_pending_load(&mut self, id: u64) -> bool {
        if self.pending_load == Some(id) {
            self.pending_load = None;
            true
        } else {
            false
        }
    }

    fn take_mutation(&mut self, id: u64) -> Option<PendingMutation> {
        self.pending_mutations.remove(&id)
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

fn step(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        current.checked_sub(1).unwrap_or(len - 1)
    }
}
