//! End-to-end chat flow against a mock assistant service.
//!
//! Exercises the provider scoping rules across one conversation: a query
//! that names an insurer is scoped to it, the mention is remembered so
//! follow-up questions stay scoped, and a fresh session with a generic
//! question reaches the assistant unscoped.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use petwell_client::AssistantClient;
use petwell_core::{ClinicStore, DirectoryCache, SessionStore};
use petwell_server::routes;
use petwell_server::state::{AppState, SharedState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "clinic_id,name,address,phone_regular,phone_emergency,whatsapp,opening_hours,emergency_24h,website_url,applemap_url,latitude,longitude,rating,google_place_id,photo_reference\n";

fn seed_clinics() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    file.write_all(b"1,Happy Paws,12 Queen's Road,2525 1234,,,Mon-Fri: 9-6,FALSE,,,,,,,\n")
        .unwrap();
    file.write_all(b"2,Night Vet,3 Nathan Road,2300 0000,2300 0001,,Daily: Open 24 hours,TRUE,,,,,,,\n")
        .unwrap();
    file.flush().unwrap();
    file
}

fn build_state(assistant_url: &str, clinics: &tempfile::NamedTempFile) -> SharedState {
    let directory = Arc::new(DirectoryCache::load(ClinicStore::new(clinics.path()), None));
    let sessions = SessionStore::new(Duration::from_secs(60));
    let assistant = AssistantClient::new(assistant_url, Duration::from_secs(5)).unwrap();
    AppState::new(sessions, directory, assistant, None)
}

/// Spawn the router on an ephemeral port and return its base URL.
async fn serve(state: SharedState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn mock_assistant(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "Here is what I found.",
            "sources": ["plan.pdf"]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn provider_scope_follows_the_conversation() {
    let assistant = MockServer::start().await;
    mock_assistant(&assistant).await;

    let clinics = seed_clinics();
    let base = serve(build_state(&assistant.uri(), &clinics)).await;
    let http = reqwest::Client::new();

    // Open a session.
    let created: serde_json::Value = http
        .post(format!("{base}/api/chat/session"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = created["session_id"].as_str().unwrap().to_string();

    // A query naming an insurer is scoped to it.
    let reply: serde_json::Value = http
        .post(format!("{base}/api/chat/ask"))
        .json(&serde_json::json!({
            "session_id": session_id,
            "query": "Tell me about Blue Cross pet insurance"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["answer"], "Here is what I found.");
    assert_eq!(reply["active_provider"], "bluecross");
    assert_eq!(reply["session_id"], session_id.as_str());

    // A follow-up that names nothing stays scoped via the remembered mention.
    let reply: serde_json::Value = http
        .post(format!("{base}/api/chat/ask"))
        .json(&serde_json::json!({
            "session_id": session_id,
            "query": "What about the waiting period?"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["active_provider"], "bluecross");

    // Inspect what actually reached the assistant.
    let requests = assistant.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["provider"], "bluecross");
    assert_eq!(first["chat_history"], serde_json::json!([]));

    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["provider"], "bluecross");
    let history = second["chat_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");
}

#[tokio::test]
async fn fresh_session_with_generic_query_is_unscoped() {
    let assistant = MockServer::start().await;
    mock_assistant(&assistant).await;

    let clinics = seed_clinics();
    let base = serve(build_state(&assistant.uri(), &clinics)).await;
    let http = reqwest::Client::new();

    // No session_id: the backend creates one.
    let reply: serde_json::Value = http
        .post(format!("{base}/api/chat/ask"))
        .json(&serde_json::json!({ "query": "What is a deductible?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(reply["active_provider"].is_null());
    assert!(reply["session_id"].as_str().is_some());

    let requests = assistant.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("provider").is_none());
}

#[tokio::test]
async fn explicit_selection_beats_keywords() {
    let assistant = MockServer::start().await;
    mock_assistant(&assistant).await;

    let clinics = seed_clinics();
    let base = serve(build_state(&assistant.uri(), &clinics)).await;
    let http = reqwest::Client::new();

    let created: serde_json::Value = http
        .post(format!("{base}/api/chat/session"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = created["session_id"].as_str().unwrap().to_string();

    let selected: serde_json::Value = http
        .post(format!("{base}/api/chat/session/{session_id}/provider"))
        .json(&serde_json::json!({ "provider": "prudential" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(selected["status"], "ok");
    assert_eq!(selected["provider"], "prudential");

    // Mentions of another insurer do not override the selection.
    let reply: serde_json::Value = http
        .post(format!("{base}/api/chat/ask"))
        .json(&serde_json::json!({
            "session_id": session_id,
            "query": "Is Blue Cross cheaper than my plan?"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["active_provider"], "prudential");

    let requests = assistant.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["provider"], "prudential");
}

#[tokio::test]
async fn validation_and_directory_routes() {
    let assistant = MockServer::start().await;
    mock_assistant(&assistant).await;

    let clinics = seed_clinics();
    let base = serve(build_state(&assistant.uri(), &clinics)).await;
    let http = reqwest::Client::new();

    // Empty query is rejected.
    let resp = http
        .post(format!("{base}/api/chat/ask"))
        .json(&serde_json::json!({ "query": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Selecting a provider on an unknown session is a 404.
    let resp = http
        .post(format!("{base}/api/chat/session/no-such-session/provider"))
        .json(&serde_json::json!({ "provider": "bolttech" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Directory snapshot and its emergency subset.
    let all: serde_json::Value =
        http.get(format!("{base}/clinics")).send().await.unwrap().json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let emergency: serde_json::Value =
        http.get(format!("{base}/emergency-clinics")).send().await.unwrap().json().await.unwrap();
    let emergency = emergency.as_array().unwrap();
    assert_eq!(emergency.len(), 1);
    assert_eq!(emergency[0]["name"], "Night Vet");
    assert_eq!(emergency[0]["emergency_24h"], true);

    // Vet search is off without a places credential.
    let resp =
        http.get(format!("{base}/api/vets?district=sha_tin")).send().await.unwrap();
    assert_eq!(resp.status(), 503);

    // Health check.
    let health: serde_json::Value =
        http.get(format!("{base}/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["status"], "ok");
}
