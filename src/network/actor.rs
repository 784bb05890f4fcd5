//! Network actor - runs question requests in the Tokio runtime

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::QuestionClient;

/// Network actor that processes question commands
pub struct NetworkActor {
    client: QuestionClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<u64>,
    cancel_handles: HashMap<u64, oneshot::Sender<()>>,
}

impl NetworkActor {
    pub fn new(client: QuestionClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchQuestions { id }) => {
                            let client = self.client.clone();
                            self.spawn(id, async move {
                                tracing::info!(id, url = %client.collection_url(), "Fetching questions");
                                match client.list().await {
                                    Ok(questions) => NetworkResponse::QuestionsLoaded { id, questions },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::CreateQuestion { id, question }) => {
                            let client = self.client.clone();
                            self.spawn(id, async move {
                                tracing::info!(id, "Creating question");
                                match client.create(&question).await {
                                    Ok(question) => NetworkResponse::QuestionCreated { id, question },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::UpdateQuestion { id, question_id, patch }) => {
                            let client = self.client.clone();
                            self.spawn(id, async move {
                                tracing::info!(id, question = %question_id, "Updating question");
                                match client.update(&question_id, &patch).await {
                                    Ok(question) => NetworkResponse::QuestionUpdated { id, question },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::DeleteQuestion { id, question_id }) => {
                            let client = self.client.clone();
                            self.spawn(id, async move {
                                tracing::info!(id, question = %question_id, "Deleting question");
                                match client.delete(&question_id).await {
                                    Ok(()) => NetworkResponse::QuestionDeleted { id, question_id },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::CancelRequest(id)) => {
                            if let Some(cancel_tx) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling request");
                                let _ = cancel_tx.send(());
                                let _ = self.response_tx.send(NetworkResponse::Cancelled { id });
                            }
                        }

                        Some(NetworkCommand::Shutdown) => {
                            // Cancel all active requests
                            for (_, cancel_tx) in self.cancel_handles.drain() {
                                let _ = cancel_tx.send(());
                            }
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_requests.join_next() => {
                    match result {
                        Ok(id) => {
                            self.cancel_handles.remove(&id);
                        }
                        Err(e) => tracing::warn!(error = %e, "Request task failed"),
                    }
                }
            }
        }
    }

    /// Run `request` with a cancellation handle registered under `id`
    fn spawn<F>(&mut self, id: u64, request: F)
    where
        F: Future<Output = NetworkResponse> + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        self.cancel_handles.insert(id, cancel_tx);
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            tokio::select! {
                biased;

                _ = &mut cancel_rx => {
                    tracing::debug!(id, "Request dropped after cancellation");
                }
                response = request => {
                    if let NetworkResponse::Failed { error, .. } = &response {
                        tracing::warn!(id, %error, "Request failed");
                    } else {
                        tracing::info!(id, "Request completed");
                    }
                    let _ = response_tx.send(response);
                }
            }
            id
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Settings;
    use crate::error::ClientError;
    use crate::models::{NewQuestion, QuestionId};

    async fn start(server: &MockServer) -> (
        mpsc::UnboundedSender<NetworkCommand>,
        mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let client = QuestionClient::new(&Settings {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        tokio::spawn(NetworkActor::new(client, resp_tx).run(cmd_rx));
        (cmd_tx, resp_rx)
    }

    #[tokio::test]
    async fn test_fetch_replies_with_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "prompt": "lorem testum 1", "answers": ["a", "b"], "correctIndex": 1 }
            ])))
            .mount(&server)
            .await;

        let (cmd_tx, mut resp_rx) = start(&server).await;
        cmd_tx.send(NetworkCommand::FetchQuestions { id: 11 }).unwrap();

        match resp_rx.recv().await.unwrap() {
            NetworkResponse::QuestionsLoaded { id, questions } => {
                assert_eq!(id, 11);
                assert_eq!(questions[0].id, QuestionId::Number(1));
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_becomes_failed() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (cmd_tx, mut resp_rx) = start(&server).await;
        cmd_tx
            .send(NetworkCommand::DeleteQuestion {
                id: 4,
                question_id: QuestionId::Number(1),
            })
            .unwrap();

        assert_eq!(
            resp_rx.recv().await.unwrap(),
            NetworkResponse::Failed {
                id: 4,
                error: ClientError::Status { status: 500 },
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_create_never_reports_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/questions"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({
                        "id": 3, "prompt": "p", "answers": ["a", "b", "c", "d"], "correctIndex": 0
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let (cmd_tx, mut resp_rx) = start(&server).await;
        cmd_tx
            .send(NetworkCommand::CreateQuestion {
                id: 9,
                question: NewQuestion {
                    prompt: "p".into(),
                    answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_index: 0,
                },
            })
            .unwrap();
        cmd_tx.send(NetworkCommand::CancelRequest(9)).unwrap();

        assert_eq!(resp_rx.recv().await, Some(NetworkResponse::Cancelled { id: 9 }));
        let late = tokio::time::timeout(Duration::from_millis(800), resp_rx.recv()).await;
        assert!(late.is_err(), "no response expected after cancel, got {:?}", late);
    }
}
