use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned question identifier.
///
/// json-server style backends hand out either numbers or strings, so both
/// are accepted and echoed back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

/// A persisted quiz question as returned by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub answers: Vec<String>,
    /// `None` when the backend sent something that is not a usable index
    #[serde(default, deserialize_with = "lenient_index")]
    pub correct_index: Option<usize>,
}

impl Question {
    /// Index to display as selected; out-of-range or missing falls back to 0
    pub fn safe_correct_index(&self) -> usize {
        match self.correct_index {
            Some(i) if i < self.answers.len() => i,
            _ => 0,
        }
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.answers.len()
    }
}

/// Accepts any JSON value, keeping only non-negative integers
fn lenient_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|n| usize::try_from(n).ok()))
}

/// Body of a create request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub prompt: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
}

/// Body of a partial update; unset fields are left off the wire
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
}

impl QuestionPatch {
    pub fn correct_index(index: usize) -> Self {
        QuestionPatch {
            correct_index: Some(index),
            ..Default::default()
        }
    }
}
