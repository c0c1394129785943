//! Live veterinary clinic search backed by the places API.

use axum::{
    Json,
    extract::{Query, State},
};
use petwell_client::Place;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::SharedState;

/// Result ceiling per search.
const MAX_RESULTS: usize = 10;

/// Search areas for the 18 Hong Kong districts: district key, centre
/// latitude, centre longitude, and search radius in metres.
const DISTRICT_AREAS: &[(&str, f64, f64, f64)] = &[
    // Hong Kong Island
    ("central_and_western", 22.2866, 114.1545, 3000.0),
    ("wan_chai", 22.2760, 114.1756, 3000.0),
    ("eastern", 22.2845, 114.2256, 4000.0),
    ("southern", 22.2473, 114.1580, 5000.0),
    // Kowloon
    ("yau_tsim_mong", 22.3030, 114.1700, 3000.0),
    ("sham_shui_po", 22.3303, 114.1622, 3000.0),
    ("kowloon_city", 22.3282, 114.1916, 3000.0),
    ("wong_tai_sin", 22.3419, 114.1953, 3000.0),
    ("kwun_tong", 22.3133, 114.2259, 3500.0),
    // New Territories
    ("kwai_tsing", 22.3561, 114.1324, 4000.0),
    ("tsuen_wan", 22.3708, 114.1048, 4000.0),
    ("tuen_mun", 22.3916, 113.9725, 5000.0),
    ("yuen_long", 22.4445, 114.0222, 5000.0),
    ("north", 22.4947, 114.1383, 6000.0),
    ("tai_po", 22.4501, 114.1688, 5000.0),
    ("sha_tin", 22.3771, 114.1974, 5000.0),
    ("sai_kung", 22.3814, 114.2704, 6000.0),
    ("islands", 22.2612, 113.9456, 8000.0),
];

#[derive(Debug, Deserialize)]
pub struct VetsQuery {
    /// Free-text search; wins over `district` when both are given.
    #[serde(default)]
    pub q: Option<String>,
    /// District key, case and separator insensitive ("Sha Tin" == "sha_tin").
    #[serde(default)]
    pub district: Option<String>,
    /// Keep only places reporting themselves open right now.
    #[serde(default)]
    pub open_now: Option<bool>,
}

#[derive(Serialize)]
pub struct VetsResponse {
    pub count: usize,
    pub results: Vec<Place>,
}

/// GET /api/vets
pub async fn search_vets(
    State(state): State<SharedState>,
    Query(query): Query<VetsQuery>,
) -> Result<Json<VetsResponse>, ApiError> {
    let Some(places) = &state.places else {
        return Err(ApiError::VetSearchUnavailable);
    };

    let free_text = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let results = if let Some(q) = free_text {
        places.search_text(&format!("veterinary clinic {q}"), MAX_RESULTS).await?
    } else if let Some(district) = query.district.as_deref() {
        let Some((latitude, longitude, radius_m)) = district_area(district) else {
            return Err(ApiError::UnknownDistrict(district.to_string()));
        };
        places.search_nearby(latitude, longitude, radius_m, MAX_RESULTS).await?
    } else {
        return Err(ApiError::BadRequest("provide q or district".into()));
    };

    let results: Vec<Place> = if query.open_now == Some(true) {
        results.into_iter().filter(|place| place.open_now == Some(true)).collect()
    } else {
        results
    };

    Ok(Json(VetsResponse { count: results.len(), results }))
}

fn district_area(name: &str) -> Option<(f64, f64, f64)> {
    let key = name.trim().to_lowercase().replace([' ', '-'], "_");
    DISTRICT_AREAS
        .iter()
        .find(|(district, ..)| *district == key)
        .map(|&(_, latitude, longitude, radius_m)| (latitude, longitude, radius_m))
}
