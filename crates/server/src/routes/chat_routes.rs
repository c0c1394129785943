//! Chat endpoints: session lifecycle, provider selection, and the ask flow.

use axum::{
    Json,
    extract::{Path, State},
};
use petwell_client::{AskContext, ProviderList};
use petwell_core::session::provider;
use petwell_core::{Role, Session};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::SharedState;

/// How many trailing turns accompany each assistant query.
const HISTORY_WINDOW: usize = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct SelectProvider {
    /// Provider identifier; an empty string selects all providers.
    pub provider: String,
}

#[derive(Serialize)]
pub struct SelectProviderResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub query: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_provider: Option<String>,
    pub session_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/chat/session
pub async fn create_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    let session = state.sessions.create().await;
    tracing::debug!(session_id = %session.id, "chat session created");
    Json(SessionResponse { session_id: session.id })
}

/// POST /api/chat/session/{id}/provider
///
/// Applies the explicit selection action. Changing the selection clears the
/// conversation history; re-selecting the current value keeps it.
pub async fn select_provider(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<SelectProvider>,
) -> Result<Json<SelectProviderResponse>, ApiError> {
    let Some(mut session) = state.sessions.get(&id).await else {
        return Err(ApiError::SessionNotFound(id));
    };

    let provider = normalize_selection(&body.provider);
    let changed = session.set_provider(provider.clone());
    state.sessions.update(session).await;

    tracing::debug!(session_id = %id, provider = ?provider, changed, "provider selection");
    Ok(Json(SelectProviderResponse { status: "ok", provider }))
}

/// POST /api/chat/ask
pub async fn ask(
    State(state): State<SharedState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".into()));
    }

    // Unknown and expired session ids get a fresh session, not an error.
    let mut session = match &body.session_id {
        Some(id) => match state.sessions.get(id).await {
            Some(session) => session,
            None => state.sessions.create().await,
        },
        None => state.sessions.create().await,
    };

    let scope = provider::resolve(Some(&session), query).map(str::to_owned);

    let context = AskContext {
        query: query.to_string(),
        provider: scope.clone(),
        session_id: session.id.clone(),
        chat_history: session.recent_turns(HISTORY_WINDOW).to_vec(),
    };

    let reply = state.assistant.ask(&context).await?;

    record_exchange(&mut session, query, &reply.answer);
    let session_id = session.id.clone();
    state.sessions.update(session).await;

    Ok(Json(AskResponse {
        answer: reply.answer,
        sources: reply.sources,
        active_provider: reply.active_provider.or(scope),
        session_id,
    }))
}

/// GET /api/chat/providers
pub async fn providers(State(state): State<SharedState>) -> Result<Json<ProviderList>, ApiError> {
    let list = state.assistant.providers().await?;
    Ok(Json(list))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_selection(provider: &str) -> Option<String> {
    let provider = provider.trim();
    if provider.is_empty() { None } else { Some(provider.to_string()) }
}

/// Append the exchange to the history and remember a mentioned provider for
/// follow-up questions.
fn record_exchange(session: &mut Session, query: &str, answer: &str) {
    session.append_turn(Role::User, query);
    session.append_turn(Role::Assistant, answer);

    if let Some(mentioned) = provider::detect(query) {
        session.last_mentioned_provider = Some(mentioned.to_string());
    }
}
