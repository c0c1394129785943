//! Places API client error types.

use std::sync::Arc;

use petwell_core::Error;

/// Errors from the Google Places API client.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// No places API key configured.
    #[error("missing API key: PETWELL_MAPS_API_KEY not set")]
    MissingApiKey,

    /// Authentication failed (invalid or unauthorized API key).
    #[error("authentication failed: key rejected by places API")]
    AuthError,

    /// Rate limited by the places API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { PlacesError::Timeout } else { PlacesError::Network(Arc::new(err)) }
    }
}

impl From<PlacesError> for Error {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::MissingApiKey | PlacesError::AuthError => Error::PlaceAuth(err.to_string()),
            other => Error::PlaceLookup(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlacesError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = PlacesError::HttpError { status: 500 };
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_auth_failures_map_to_place_auth() {
        let core: Error = PlacesError::AuthError.into();
        assert!(matches!(core, Error::PlaceAuth(_)));

        let core: Error = PlacesError::RateLimited.into();
        assert!(matches!(core, Error::PlaceLookup(_)));
    }
}
