//! Shared application state for route handlers.

use std::sync::Arc;

use petwell_client::{AssistantClient, PlacesClient};
use petwell_core::{DirectoryCache, SessionStore};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionStore,
    pub directory: Arc<DirectoryCache>,
    pub assistant: AssistantClient,
    /// Absent when no places API key is configured; live vet search is
    /// disabled in that case.
    pub places: Option<PlacesClient>,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        directory: Arc<DirectoryCache>,
        assistant: AssistantClient,
        places: Option<PlacesClient>,
    ) -> SharedState {
        Arc::new(Self { sessions, directory, assistant, places })
    }
}
