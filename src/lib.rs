//! # Quiz Admin
//!
//! A terminal quiz-authoring client for a REST question backend.
//!
//! ## Features
//! - List questions from `GET /questions`
//! - Author new questions (prompt, four answers, correct answer)
//! - Change the correct answer of an existing question (`PATCH`)
//! - Delete questions (`DELETE`)
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (question store, form controller, view selector)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod config;
pub mod error;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{NewQuestion, Question, QuestionId, QuestionPatch};
pub use config::{Overrides, Settings};
pub use error::{ClientError, ConfigError, StoreError, ValidationError};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, FormController, QuestionStore, View, ViewSelector};
pub use network::{NetworkActor, QuestionClient};
