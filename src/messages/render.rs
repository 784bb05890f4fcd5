//! Render state - data structure sent from App layer to UI for rendering

use chrono::{DateTime, Utc};

use crate::app::view::View;
use crate::constants::{ANSWER_COUNT, DEFAULT_BASE_URL};
use crate::messages::ui_events::{FormField, InputMode};
use crate::models::Question;

/// Snapshot of the draft form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormRender {
    pub prompt: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct_index: Option<usize>,
    pub error: Option<String>,
    pub submitting: bool,
    pub active_field: FormField,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub view: View,
    pub backend: String,

    // List
    pub questions: Vec<Question>,
    pub selected_question: usize,
    pub is_loading: bool,
    pub loaded_at: Option<DateTime<Utc>>,
    pub load_error: Option<String>,
    pub list_error: Option<String>,

    // Form
    pub form: FormRender,

    // Editing
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Popups
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            view: View::List,
            backend: String::from(DEFAULT_BASE_URL),
            questions: Vec::new(),
            selected_question: 0,
            is_loading: false,
            loaded_at: None,
            load_error: None,
            list_error: None,
            form: FormRender::default(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
        }
    }
}
