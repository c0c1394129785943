//! Insurance assistant service client.
//!
//! Thin JSON client for the retrieval-backed assistant that answers pet
//! insurance questions. Session state lives entirely in this backend; the
//! client ships only the query, the resolved provider scope, and the recent
//! history window.

pub mod error;

pub use error::AssistantError;

use std::sync::Arc;
use std::time::Duration;

use petwell_core::ChatTurn;
use serde::{Deserialize, Serialize};

/// Context shipped with one assistant query.
#[derive(Debug, Clone, Serialize)]
pub struct AskContext {
    pub query: String,
    /// Provider scope; omitted from the wire when the query is unscoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub session_id: String,
    pub chat_history: Vec<ChatTurn>,
}

/// Assistant answer payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantReply {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub active_provider: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One selectable insurance provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Provider list for the picker UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderList {
    #[serde(default)]
    pub providers: Vec<ProviderInfo>,
}

/// Assistant service client.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    /// Create a new assistant client for the given base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Network(Arc::new(e)))?;

        let base_url = base_url.into();
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Ask the assistant one question with conversation context.
    pub async fn ask(&self, context: &AskContext) -> Result<AssistantReply, AssistantError> {
        let url = format!("{}/ask", self.base_url);

        tracing::debug!(
            session_id = %context.session_id,
            provider = ?context.provider,
            "assistant ask"
        );

        let response = self.http.post(&url).json(context).send().await?;
        Self::decode(response).await
    }

    /// Fetch the provider list for the picker.
    pub async fn providers(&self) -> Result<ProviderList, AssistantError> {
        let url = format!("{}/providers", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AssistantError> {
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::HttpError { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AssistantError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petwell_core::Role;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_with_history() -> AskContext {
        AskContext {
            query: "does it cover dental?".into(),
            provider: Some("bluecross".into()),
            session_id: "sess-1".into(),
            chat_history: vec![
                ChatTurn { role: Role::User, content: "tell me about Blue Cross".into() },
                ChatTurn { role: Role::Assistant, content: "Blue Cross offers...".into() },
            ],
        }
    }

    #[test]
    fn test_unscoped_context_omits_provider() {
        let context = AskContext {
            query: "what is a deductible?".into(),
            provider: None,
            session_id: "sess-1".into(),
            chat_history: vec![],
        };

        let json = serde_json::to_value(&context).unwrap();
        assert!(json.get("provider").is_none());
        assert_eq!(json["chat_history"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_ask_posts_context_and_decodes_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_partial_json(serde_json::json!({
                "query": "does it cover dental?",
                "provider": "bluecross",
                "session_id": "sess-1",
                "chat_history": [
                    { "role": "user", "content": "tell me about Blue Cross" },
                    { "role": "assistant", "content": "Blue Cross offers..." }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Dental is covered under the premium plan.",
                "sources": ["bluecross/plan.pdf"],
                "active_provider": "bluecross"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AssistantClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let reply = client.ask(&context_with_history()).await.unwrap();

        assert_eq!(reply.answer, "Dental is covered under the premium plan.");
        assert_eq!(reply.sources, vec!["bluecross/plan.pdf"]);
        assert_eq!(reply.active_provider.as_deref(), Some("bluecross"));
        assert!(reply.session_id.is_none());
    }

    #[tokio::test]
    async fn test_ask_keeps_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = AssistantClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let result = client.ask(&context_with_history()).await;

        match result {
            Err(AssistantError::HttpError { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected HttpError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_providers_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "providers": [
                    { "id": "bluecross", "name": "Blue Cross" },
                    { "id": "one_degree", "name": "OneDegree" }
                ]
            })))
            .mount(&server)
            .await;

        let client = AssistantClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let list = client.providers().await.unwrap();

        assert_eq!(list.providers.len(), 2);
        assert_eq!(list.providers[0].id, "bluecross");
        assert_eq!(list.providers[1].name, "OneDegree");
    }

    #[tokio::test]
    async fn test_invalid_reply_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AssistantClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let result = client.ask(&context_with_history()).await;
        assert!(matches!(result, Err(AssistantError::Parse(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client =
            AssistantClient::new("http://localhost:8001/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8001");
    }
}
