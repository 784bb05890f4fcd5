//! Network layer - HTTP requests against the question backend
//!
//! The Network actor receives question commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::QuestionClient;
