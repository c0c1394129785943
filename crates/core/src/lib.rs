//! Core types and shared functionality for petwell.
//!
//! This crate provides:
//! - Chat session store with TTL expiry and provider tracking
//! - CSV-backed clinic directory with background enrichment
//! - Configuration structures
//! - Unified error types

pub mod config;
pub mod directory;
pub mod error;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use directory::{ClinicRecord, ClinicStore, DirectoryCache, PlaceDetails, PlaceLookup};
pub use error::Error;
pub use session::{ChatTurn, Role, Session, SessionStore};
