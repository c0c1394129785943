//! Assistant service client error types.

use std::sync::Arc;

use petwell_core::Error;

/// Errors from the insurance assistant client.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Non-2xx response; the body is kept for diagnosis.
    #[error("HTTP error: {status}: {body}")]
    HttpError { status: u16, body: String },

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

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { AssistantError::Timeout } else { AssistantError::Network(Arc::new(err)) }
    }
}

impl From<AssistantError> for Error {
    fn from(err: AssistantError) -> Self {
        Error::Assistant(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_keeps_body() {
        let err = AssistantError::HttpError { status: 502, body: "upstream down".into() };
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("upstream down"));
    }

    #[test]
    fn test_maps_to_core_assistant_error() {
        let core: Error = AssistantError::Timeout.into();
        assert!(matches!(core, Error::Assistant(_)));
    }
}
