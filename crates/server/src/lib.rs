//! HTTP surface for petwell.
//!
//! This crate wires the session store, clinic directory, and outbound
//! clients into an axum router. The binary in `main.rs` handles
//! configuration, logging, and lifecycle.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, SharedState};
