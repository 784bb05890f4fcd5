//! HTTP client wrapper - the four calls against the questions resource

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::config::Settings;
use crate::constants::QUESTIONS_PATH;
use crate::error::ClientError;
use crate::models::{NewQuestion, Question, QuestionId, QuestionPatch};

/// Typed client for `/questions`
#[derive(Clone, Debug)]
pub struct QuestionClient {
    http: reqwest::Client,
    collection: Url,
}

impl QuestionClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let collection = collection_url(&settings.base_url)?;
        Ok(QuestionClient {
            http: create_client(settings),
            collection,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of a single question
    pub fn item_url(&self, id: &QuestionId) -> Url {
        let mut url = self.collection.clone();
        // The collection URL was validated as a base in `collection_url`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    /// GET /questions
    pub async fn list(&self) -> Result<Vec<Question>, ClientError> {
        let resp = self
            .http
            .get(self.collection.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        decode(check_status(resp)?).await
    }

    /// POST /questions
    pub async fn create(&self, question: &NewQuestion) -> Result<Question, ClientError> {
        let resp = self
            .http
            .post(self.collection.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(question)
            .send()
            .await?;
        decode(check_status(resp)?).await
    }

    /// PATCH /questions/{id}
    pub async fn update(
        &self,
        id: &QuestionId,
        patch: &QuestionPatch,
    ) -> Result<Question, ClientError> {
        let resp = self
            .http
            .patch(self.item_url(id))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(patch)
            .send()
            .await?;
        decode(check_status(resp)?).await
    }

    /// DELETE /questions/{id}; any body is ignored
    pub async fn delete(&self, id: &QuestionId) -> Result<(), ClientError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        check_status(resp)?;
        Ok(())
    }
}

/// Append the questions segment to the configured root
fn collection_url(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };
    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| invalid(String::from("URL cannot be a base")))?
        .pop_if_empty()
        .push(QUESTIONS_PATH);
    Ok(url)
}

/// Anything outside 2xx/3xx is a failure
fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() || status.is_redirection() {
        Ok(resp)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
        })
    }
}

/// Parse the body into `T`, keeping decode failures distinct from transport ones
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Create an HTTP client with default configuration
pub fn create_client(settings: &Settings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> QuestionClient {
        QuestionClient::new(&Settings {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    fn seed() -> serde_json::Value {
        json!([
            { "id": 1, "prompt": "lorem testum 1", "answers": ["choice 1", "choice 2", "choice 3", "choice 4"], "correctIndex": 0 },
            { "id": 2, "prompt": "lorem testum 2", "answers": ["choice 1", "choice 2", "choice 3", "choice 4"], "correctIndex": 3 }
        ])
    }

    #[test]
    fn test_collection_url_respects_prefix() {
        let url = collection_url("http://localhost:4000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/questions");
        let url = collection_url("http://example.com/api/").unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/questions");
        assert!(matches!(
            collection_url("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_item_url_escapes_text_ids() {
        let client = QuestionClient::new(&Settings::default()).unwrap();
        assert_eq!(
            client.item_url(&QuestionId::Number(7)).as_str(),
            "http://localhost:4000/questions/7"
        );
        assert_eq!(
            client.item_url(&QuestionId::from("a/b")).as_str(),
            "http://localhost:4000/questions/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_list_parses_questions_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seed()))
            .mount(&server)
            .await;

        let questions = client_for(&server).list().await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt, "lorem testum 1");
        assert_eq!(questions[1].correct_index, Some(3));
    }

    #[tokio::test]
    async fn test_create_posts_camel_case_body() {
        let server = MockServer::start().await;
        let body = json!({
            "prompt": "Test Prompt",
            "answers": ["Answer 1", "Answer 2", "Answer 3", "Answer 4"],
            "correctIndex": 1
        });
        let mut created = body.clone();
        created["id"] = json!(3);

        Mock::given(method("POST"))
            .and(path("/questions"))
            .and(header("content-type", "application/json"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(201).set_body_json(created))
            .expect(1)
            .mount(&server)
            .await;

        let question = client_for(&server)
            .create(&serde_json::from_value(body).unwrap())
            .await
            .unwrap();
        assert_eq!(question.id, QuestionId::Number(3));
        assert_eq!(question.answers[1], "Answer 2");
    }

    #[tokio::test]
    async fn test_update_patches_single_field() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/questions/1"))
            .and(body_json(json!({ "correctIndex": 3 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "prompt": "lorem testum 1",
                "answers": ["choice 1", "choice 2", "choice 3", "choice 4"],
                "correctIndex": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let question = client_for(&server)
            .update(&QuestionId::Number(1), &QuestionPatch::correct_index(3))
            .await
            .unwrap();
        assert_eq!(question.correct_index, Some(3));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/questions/2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .delete(&QuestionId::Number(2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete(&QuestionId::Number(99))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Status { status: 404 });
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .mount(&server)
            .await;

        let err = client_for(&server).list().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_connection_error() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = QuestionClient::new(&Settings {
            base_url: format!("http://127.0.0.1:{}", port),
            ..Default::default()
        })
        .unwrap();

        let err = client.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
