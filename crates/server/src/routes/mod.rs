//! HTTP routes for the petwell backend.
//!
//! Chat endpoints live under `/api/chat`, live vet search under `/api/vets`,
//! and the clinic directory at the root. CORS is permissive so the web
//! frontend can be served from anywhere.

pub mod chat_routes;
pub mod clinic_routes;
pub mod vet_routes;

use axum::{
    Json, Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::state::SharedState;

pub fn app(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        // Clinic directory
        .route("/clinics", get(clinic_routes::list_clinics))
        .route("/emergency-clinics", get(clinic_routes::emergency_clinics))
        // Chat
        .route("/api/chat/session", post(chat_routes::create_session))
        .route("/api/chat/session/{id}/provider", post(chat_routes::select_provider))
        .route("/api/chat/ask", post(chat_routes::ask))
        .route("/api/chat/providers", get(chat_routes::providers))
        // Live vet search
        .route("/api/vets", get(vet_routes::search_vets))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "petwell"
    }))
}
