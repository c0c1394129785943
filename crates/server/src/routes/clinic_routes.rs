//! Clinic directory endpoints.

use axum::{Json, extract::State};
use petwell_core::ClinicRecord;

use crate::state::SharedState;

/// GET /clinics
pub async fn list_clinics(State(state): State<SharedState>) -> Json<Vec<ClinicRecord>> {
    Json(state.directory.snapshot().await)
}

/// GET /emergency-clinics
pub async fn emergency_clinics(State(state): State<SharedState>) -> Json<Vec<ClinicRecord>> {
    Json(state.directory.snapshot_filtered(|c| c.emergency_24h).await)
}
