//! Network messages - communication between App and Network layers

use crate::error::ClientError;
use crate::models::{NewQuestion, Question, QuestionId, QuestionPatch};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// GET the whole collection
    FetchQuestions { id: u64 },
    /// POST a new question
    CreateQuestion { id: u64, question: NewQuestion },
    /// PATCH an existing question
    UpdateQuestion {
        id: u64,
        question_id: QuestionId,
        patch: QuestionPatch,
    },
    /// DELETE an existing question
    DeleteQuestion { id: u64, question_id: QuestionId },
    /// Cancel a pending request
    CancelRequest(u64),
    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    /// Request id carried by the command, if it starts a request
    pub fn request_id(&self) -> Option<u64> {
        match self {
            NetworkCommand::FetchQuestions { id }
            | NetworkCommand::CreateQuestion { id, .. }
            | NetworkCommand::UpdateQuestion { id, .. }
            | NetworkCommand::DeleteQuestion { id, .. } => Some(*id),
            NetworkCommand::CancelRequest(_) | NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResponse {
    QuestionsLoaded { id: u64, questions: Vec<Question> },
    QuestionCreated { id: u64, question: Question },
    QuestionUpdated { id: u64, question: Question },
    QuestionDeleted { id: u64, question_id: QuestionId },
    /// Any request that did not succeed
    Failed { id: u64, error: ClientError },
    /// Request was cancelled before it completed
    Cancelled { id: u64 },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::QuestionsLoaded { id, .. } => *id,
            NetworkResponse::QuestionCreated { id, .. } => *id,
            NetworkResponse::QuestionUpdated { id, .. } => *id,
            NetworkResponse::QuestionDeleted { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
            NetworkResponse::Cancelled { id } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_id_matches_request() {
        let cmd = NetworkCommand::DeleteQuestion {
            id: 7,
            question_id: QuestionId::Number(3),
        };
        let responses = [
            NetworkResponse::QuestionDeleted {
                id: 7,
                question_id: QuestionId::Number(3),
            },
            NetworkResponse::Failed {
                id: 7,
                error: ClientError::Timeout,
            },
            NetworkResponse::Cancelled { id: 7 },
        ];
        for response in responses {
            assert_eq!(Some(response.id()), cmd.request_id());
        }
        assert_eq!(NetworkCommand::CancelRequest(7).request_id(), None);
    }
}
