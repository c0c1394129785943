//! Outbound HTTP clients for petwell.
//!
//! This crate provides the Google Places API client used for clinic
//! enrichment and live vet search, and the insurance assistant client used
//! by the chat flow.

pub mod assistant;
pub mod places;

pub use assistant::{AskContext, AssistantClient, AssistantError, AssistantReply, ProviderInfo, ProviderList};
pub use places::{Place, PlacesClient, PlacesConfig, PlacesError};
