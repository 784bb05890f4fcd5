//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::view::View;
use crate::constants::ANSWER_COUNT;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation bar
    SwitchView(View),

    // List view
    NextQuestion,
    PrevQuestion,
    DeleteSelected,
    Reload,

    // Correct-answer selector (list item or form, depending on view)
    NextCorrectAnswer,
    PrevCorrectAnswer,

    // Form field focus
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    SubmitForm,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focusable fields of the new-question form
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FormField {
    #[default]
    Prompt,
    Answer(usize),
    CorrectAnswer,
    Submit,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match *self {
            FormField::Prompt => FormField::Answer(0),
            FormField::Answer(i) if i + 1 < ANSWER_COUNT => FormField::Answer(i + 1),
            FormField::Answer(_) => FormField::CorrectAnswer,
            FormField::CorrectAnswer => FormField::Submit,
            FormField::Submit => FormField::Prompt,
        }
    }

    pub fn prev(&self) -> FormField {
        match *self {
            FormField::Prompt => FormField::Submit,
            FormField::Answer(0) => FormField::Prompt,
            FormField::Answer(i) => FormField::Answer(i - 1),
            FormField::CorrectAnswer => FormField::Answer(ANSWER_COUNT - 1),
            FormField::Submit => FormField::CorrectAnswer,
        }
    }

    /// Whether the field holds free text
    pub fn is_text(&self) -> bool {
        matches!(self, FormField::Prompt | FormField::Answer(_))
    }

    pub fn label(&self) -> String {
        match self {
            FormField::Prompt => String::from("Prompt"),
            FormField::Answer(i) => format!("Answer {}", i + 1),
            FormField::CorrectAnswer => String::from("Correct Answer"),
            FormField::Submit => String::from("Add Question"),
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    view: View,
    active_field: FormField,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Navigation bar (only in normal mode, not editing)
    if input_mode == InputMode::Normal {
        match key.code {
            KeyCode::Char('1') => return Some(UiEvent::SwitchView(View::List)),
            KeyCode::Char('2') => return Some(UiEvent::SwitchView(View::Form)),
            _ => {}
        }
    }

    match view {
        View::List => handle_list_keys(key),
        View::Form => handle_form_keys(key, active_field, input_mode),
    }
}

/// Handle keys for the question list
fn handle_list_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('n') => Some(UiEvent::SwitchView(View::Form)),
        KeyCode::Char('r') => Some(UiEvent::Reload),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevQuestion),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextQuestion),
        KeyCode::Left | KeyCode::Char('h') => Some(UiEvent::PrevCorrectAnswer),
        KeyCode::Right | KeyCode::Char('l') => Some(UiEvent::NextCorrectAnswer),
        _ => None,
    }
}

/// Handle keys for the new-question form
fn handle_form_keys(key: KeyEvent, active_field: FormField, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Esc => Some(UiEvent::SwitchView(View::List)),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Char('s') => Some(UiEvent::SubmitForm),
            KeyCode::Left if active_field == FormField::CorrectAnswer => {
                Some(UiEvent::PrevCorrectAnswer)
            }
            KeyCode::Right if active_field == FormField::CorrectAnswer => {
                Some(UiEvent::NextCorrectAnswer)
            }
            KeyCode::Char('e') | KeyCode::Enter => match active_field {
                FormField::Prompt | FormField::Answer(_) => Some(UiEvent::StartEditing),
                FormField::CorrectAnswer => Some(UiEvent::NextCorrectAnswer),
                FormField::Submit => Some(UiEvent::SubmitForm),
            },
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
