//! Places API (v1) response types and normalization.

use petwell_core::PlaceDetails;
use serde::{Deserialize, Serialize};

/// Raw response from the v1 search endpoints.
///
/// The API omits the `places` array entirely when nothing matched.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub places: Vec<PlaceResource>,
}

/// Raw place resource as returned by the v1 API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u32>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub current_opening_hours: Option<OpeningHoursInfo>,
    #[serde(default)]
    pub regular_opening_hours: Option<OpeningHoursInfo>,
    #[serde(default)]
    pub photos: Vec<PhotoResource>,
}

#[derive(Debug, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursInfo {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
}

/// Photo attachment. `name` is the resource path used to build media URLs.
#[derive(Debug, Deserialize)]
pub struct PhotoResource {
    #[serde(default)]
    pub name: String,
}

/// Normalized place for internal use and the live vet search response.
#[derive(Debug, Clone, Serialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "userRatingsTotal", skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "businessStatus", skip_serializing_if = "Option::is_none")]
    pub business_status: Option<String>,
    #[serde(rename = "openNow", skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opening_hours: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,
}

impl From<PlaceResource> for Place {
    /// Convert a raw v1 place resource to the normalized internal format.
    ///
    /// Current opening hours win over regular ones when both are present.
    fn from(raw: PlaceResource) -> Self {
        let open_now = raw
            .current_opening_hours
            .as_ref()
            .and_then(|h| h.open_now)
            .or_else(|| raw.regular_opening_hours.as_ref().and_then(|h| h.open_now));

        let opening_hours = match (&raw.current_opening_hours, &raw.regular_opening_hours) {
            (Some(current), _) if !current.weekday_descriptions.is_empty() => {
                current.weekday_descriptions.clone()
            }
            (_, Some(regular)) => regular.weekday_descriptions.clone(),
            _ => Vec::new(),
        };

        Place {
            place_id: raw.id,
            name: raw.display_name.map(|d| d.text).unwrap_or_default(),
            address: raw.formatted_address,
            phone: raw.national_phone_number.or(raw.international_phone_number),
            latitude: raw.location.map(|l| l.latitude),
            longitude: raw.location.map(|l| l.longitude),
            rating: raw.rating,
            user_ratings_total: raw.user_rating_count,
            website: raw.website_uri,
            business_status: raw.business_status,
            open_now,
            opening_hours,
            photo_reference: raw.photos.first().map(|p| p.name.clone()),
        }
    }
}

impl Place {
    /// Reduce to the fields the clinic enrichment pass merges.
    pub fn into_details(self) -> PlaceDetails {
        PlaceDetails {
            latitude: self.latitude,
            longitude: self.longitude,
            rating: self.rating,
            phone: self.phone,
            website: self.website,
            opening_hours: self.opening_hours,
            photo_reference: self.photo_reference,
        }
    }
}
