//! Google Places API (v1) client.
//!
//! Covers the three calls the rest of the system needs: free-text search,
//! nearby search restricted to veterinary care, and single-place detail
//! fetches. Responses are normalized into stable [`Place`] values.
//!
//! ### Specification
//!
//! - **Endpoints**: `POST {base}/places:searchText`,
//!   `POST {base}/places:searchNearby`, `GET {base}/places/{id}`
//! - **Authentication**: `X-Goog-Api-Key` header.
//! - **Field selection**: every call sends an `X-Goog-FieldMask` header
//!   listing exactly the fields it consumes.

pub mod error;
pub mod response;

pub use error::PlacesError;
pub use response::{Place, PlaceResource, SearchResponse};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use petwell_core::{Error, PlaceDetails, PlaceLookup};
use reqwest::header;
use serde_json::json;

/// Default base URL for the Places API.
const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "petwell/0.1";

/// Response fields requested from the search endpoints.
const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
    places.nationalPhoneNumber,places.internationalPhoneNumber,places.location,places.rating,\
    places.userRatingCount,places.websiteUri,places.businessStatus,places.currentOpeningHours,\
    places.regularOpeningHours,places.photos";

/// Response fields requested from the place details endpoint.
const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,nationalPhoneNumber,\
    internationalPhoneNumber,location,rating,userRatingCount,websiteUri,businessStatus,\
    currentOpeningHours,regularOpeningHours,photos";

/// Identifier-only mask for find-place lookups.
const FIND_FIELD_MASK: &str = "places.id";

/// Places API client configuration.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key, from PETWELL_MAPS_API_KEY.
    pub api_key: String,
    /// Base URL (default: https://places.googleapis.com/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: petwell/0.x).
    pub user_agent: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PlacesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), ..Default::default() }
    }
}

/// Places API client.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    config: PlacesConfig,
}

impl PlacesClient {
    /// Create a new places client with the given configuration.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        if config.api_key.is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlacesError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Free-text place search.
    pub async fn search_text(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}/places:searchText", self.config.base_url);
        let body = json!({
            "textQuery": query,
            "maxResultCount": max_results,
        });

        tracing::debug!(query, "places text search");

        let response: SearchResponse = self.post_json(&url, SEARCH_FIELD_MASK, &body).await?;
        Ok(response.places.into_iter().map(Place::from).collect())
    }

    /// Search for veterinary care inside a circle around a coordinate.
    pub async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        max_results: usize,
    ) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}/places:searchNearby", self.config.base_url);
        let body = json!({
            "includedTypes": ["veterinary_care"],
            "maxResultCount": max_results,
            "locationRestriction": {
                "circle": {
                    "center": { "latitude": latitude, "longitude": longitude },
                    "radius": radius_m,
                }
            }
        });

        tracing::debug!(latitude, longitude, radius_m, "places nearby search");

        let response: SearchResponse = self.post_json(&url, SEARCH_FIELD_MASK, &body).await?;
        Ok(response.places.into_iter().map(Place::from).collect())
    }

    /// Resolve a place identifier from a name and address, if anything
    /// matches.
    pub async fn find_place_id(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<String>, PlacesError> {
        let url = format!("{}/places:searchText", self.config.base_url);
        let body = json!({
            "textQuery": format!("{name} {address}"),
            "maxResultCount": 1,
        });

        let response: SearchResponse = self.post_json(&url, FIND_FIELD_MASK, &body).await?;
        Ok(response.places.into_iter().next().map(|p| p.id).filter(|id| !id.is_empty()))
    }

    /// Fetch full details for one place.
    pub async fn fetch_place(&self, place_id: &str) -> Result<Place, PlacesError> {
        let url = format!("{}/places/{}", self.config.base_url, place_id);
        let request = self
            .http
            .get(&url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .header(header::USER_AGENT, &self.config.user_agent);

        let resource: PlaceResource = self.execute(request).await?;
        Ok(resource.into())
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        field_mask: &str,
        body: &serde_json::Value,
    ) -> Result<T, PlacesError> {
        let request = self
            .http
            .post(url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", field_mask)
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(body);

        self.execute(request).await
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PlacesError> {
        let response = request.send().await?;
        let status = response.status();

        tracing::debug!(status = %status, "places API response");

        if status == 401 || status == 403 {
            return Err(PlacesError::AuthError);
        }

        if status == 429 {
            return Err(PlacesError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(PlacesError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| PlacesError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PlaceLookup for PlacesClient {
    async fn find_place(&self, name: &str, address: &str) -> Result<Option<String>, Error> {
        Ok(self.find_place_id(name, address).await?)
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, Error> {
        let place = self.fetch_place(place_id).await?;
        Ok(place.into_details())
    }
}
