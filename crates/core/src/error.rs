//! Unified error types for the petwell backend.

/// Unified error types shared across the petwell crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No live session for the given identifier (absent or expired).
    #[error("SESSION_NOT_FOUND: {0}")]
    SessionNotFound(String),

    /// Durable clinic storage could not be read or written.
    #[error("STORAGE_ERROR: {0}")]
    Storage(#[from] csv::Error),

    /// Filesystem operation on the durable store failed.
    #[error("STORAGE_ERROR: {0}")]
    Io(#[from] std::io::Error),

    /// External place lookup failed.
    #[error("PLACE_LOOKUP_FAILED: {0}")]
    PlaceLookup(String),

    /// External place lookup rejected our credential.
    #[error("PLACE_AUTH_ERROR: {0}")]
    PlaceAuth(String),

    /// Assistant service call failed.
    #[error("ASSISTANT_ERROR: {0}")]
    Assistant(String),
}
