//! Clinic directory: CSV-backed records, the in-memory cache served to
//! handlers, and the background enrichment pass that fills record gaps
//! from an external place lookup.

pub mod cache;
pub mod enrich;
pub mod record;
pub mod store;

pub use cache::DirectoryCache;
pub use enrich::{PlaceDetails, PlaceLookup};
pub use record::{CSV_HEADER, ClinicRecord, MIN_FIELDS};
pub use store::ClinicStore;
