//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default backend root when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Path segment of the question collection under the backend root
pub const QUESTIONS_PATH: &str = "questions";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "quiz-admin.log";

/// Directory under $HOME holding the config file
pub const CONFIG_DIR_NAME: &str = ".quiz-admin";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Number of answers authored per question
pub const ANSWER_COUNT: usize = 4;

/// Shown when a draft is submitted with missing fields
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill out all fields";

/// Shown when the create request fails
pub const CREATE_FAILED_MESSAGE: &str = "Failed to add question";

/// Shown when a correct-answer change fails
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update question";

/// Shown when a delete fails
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete question";

/// Shown when the question list cannot be fetched
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch questions";

/// Application name
pub const APP_NAME: &str = "Quiz Admin";
