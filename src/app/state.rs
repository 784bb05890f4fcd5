//! App state - pure data structure with no I/O logic

use std::collections::HashMap;

use crate::app::form::FormController;
use crate::app::store::QuestionStore;
use crate::app::view::{View, ViewSelector};
use crate::messages::render::FormRender;
use crate::messages::ui_events::{FormField, InputMode};
use crate::messages::RenderState;
use crate::models::QuestionId;

/// A list mutation awaiting its response
#[derive(Clone, Debug, PartialEq)]
pub enum PendingMutation {
    Delete {
        question_id: QuestionId,
    },
    CorrectIndex {
        question_id: QuestionId,
        requested: usize,
    },
}

/// Correct-index bookkeeping for a question with PATCHes in flight
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSync {
    /// Last value the server acknowledged (or loaded)
    pub acknowledged: Option<usize>,
    /// Most recently issued request, while it is still unanswered
    pub latest: Option<u64>,
    pub in_flight: usize,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub backend: String,

    // Screens
    pub views: ViewSelector,

    // List
    pub store: QuestionStore,
    pub selected_question: usize,
    pub list_error: Option<String>,
    pub pending_load: Option<u64>,
    pub pending_mutations: HashMap<u64, PendingMutation>,
    pub index_sync: HashMap<QuestionId, IndexSync>,

    // Form
    pub form: FormController,
    pub active_field: FormField,

    // Editing
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Popups
    pub show_help: bool,

    pub next_request_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_BASE_URL)
    }
}

impl AppState {
    pub fn new(backend: impl Into<String>) -> Self {
        AppState {
            backend: backend.into(),
            views: ViewSelector::new(),
            store: QuestionStore::new(),
            selected_question: 0,
            list_error: None,
            pending_load: None,
            pending_mutations: HashMap::new(),
            index_sync: HashMap::new(),
            form: FormController::new(),
            active_field: FormField::Prompt,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn view(&self) -> View {
        self.views.active()
    }

    /// Text of the focused form field
    pub fn current_input(&self) -> &str {
        match self.active_field {
            FormField::Prompt => self.form.prompt(),
            FormField::Answer(i) => self.form.answer(i).unwrap_or(""),
            FormField::CorrectAnswer | FormField::Submit => "",
        }
    }

    /// Replace the text of the focused form field
    pub fn set_current_input(&mut self, text: String) {
        match self.active_field {
            FormField::Prompt => self.form.set_prompt(text),
            FormField::Answer(i) => self.form.set_answer(i, text),
            FormField::CorrectAnswer | FormField::Submit => {}
        }
    }

    /// Id of the highlighted list item
    pub fn selected_id(&self) -> Option<QuestionId> {
        self.store
            .questions()
            .get(self.selected_question)
            .map(|q| q.id.clone())
    }

    /// Keep the selection inside the list after it shrinks
    pub fn clamp_selection(&mut self) {
        let len = self.store.len();
        if len == 0 {
            self.selected_question = 0;
        } else if self.selected_question >= len {
            self.selected_question = len - 1;
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            view: self.view(),
            backend: self.backend.clone(),
            questions: self.store.questions().to_vec(),
            selected_question: self.selected_question,
            is_loading: self.pending_load.is_some(),
            loaded_at: self.store.loaded_at(),
            load_error: self.store.load_error().map(str::to_string),
            list_error: self.list_error.clone(),
            form: FormRender {
                prompt: self.form.prompt().to_string(),
                answers: self.form.answers().clone(),
                correct_index: self.form.correct_index(),
                error: self.form.submission_error().map(str::to_string),
                submitting: self.form.is_submitting(),
                active_field: self.active_field,
            },
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            show_help: self.show_help,
        }
    }
}
