//! Structured errors for the petwell HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use petwell_client::{AssistantError, PlacesError};
use petwell_core::Error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("unknown district: {0}")]
    UnknownDistrict(String),

    /// Live vet search needs the places credential.
    #[error("vet search unavailable: no places API key configured")]
    VetSearchUnavailable,

    #[error("assistant request failed: {0}")]
    Assistant(String),

    #[error("places request failed: {0}")]
    Places(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::UnknownDistrict(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::VetSearchUnavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            ApiError::Assistant(_) | ApiError::Places(_) => {
                tracing::warn!(error = %self, "upstream failure");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".into())
            }
        };

        (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::SessionNotFound(id) => ApiError::SessionNotFound(id),
            Error::Assistant(msg) => ApiError::Assistant(msg),
            Error::PlaceLookup(msg) | Error::PlaceAuth(msg) => ApiError::Places(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        ApiError::Assistant(err.to_string())
    }
}

impl From<PlacesError> for ApiError {
    fn from(err: PlacesError) -> Self {
        ApiError::Places(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let resp = ApiError::BadRequest("query must not be empty".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "query must not be empty");
    }

    #[tokio::test]
    async fn session_not_found_returns_404() {
        let resp = ApiError::SessionNotFound("sess-x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("sess-x"));
    }

    #[tokio::test]
    async fn unknown_district_returns_400() {
        let resp = ApiError::UnknownDistrict("atlantis".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn vet_search_unavailable_returns_503() {
        let resp = ApiError::VetSearchUnavailable.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn upstream_failures_return_502() {
        let resp = ApiError::Assistant("connection refused".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = ApiError::Places("rate limited".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let resp = ApiError::Internal("csv file corrupt at row 17".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "internal server error");
    }

    #[test]
    fn core_errors_map_to_statuses() {
        let api: ApiError = Error::InvalidInput("bad".into()).into();
        assert!(matches!(api, ApiError::BadRequest(_)));

        let api: ApiError = Error::SessionNotFound("s1".into()).into();
        assert!(matches!(api, ApiError::SessionNotFound(_)));

        let api: ApiError = Error::PlaceAuth("denied".into()).into();
        assert!(matches!(api, ApiError::Places(_)));

        let api: ApiError = Error::Io(std::io::Error::other("disk gone")).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }
}
