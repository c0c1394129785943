//! Clinic record type and its durable CSV row shape.
//!
//! The durable dataset is one header row followed by rows of 15 text
//! columns. The two trailing columns (`google_place_id`, `photo_reference`)
//! are absent in legacy rows and default to empty; anything shorter than the
//! 13-column base shape is malformed and dropped by the loader.

use serde::{Deserialize, Serialize};

use crate::directory::enrich::PlaceDetails;

/// Column order of the durable CSV, header row included.
pub const CSV_HEADER: &[&str] = &[
    "clinic_id",
    "name",
    "address",
    "phone_regular",
    "phone_emergency",
    "whatsapp",
    "opening_hours",
    "emergency_24h",
    "website_url",
    "applemap_url",
    "latitude",
    "longitude",
    "rating",
    "google_place_id",
    "photo_reference",
];

/// Minimum column count for a row to be usable.
pub const MIN_FIELDS: usize = 13;

/// One clinic in the directory.
///
/// Enrichment is monotonic: fields are only ever filled in, never cleared,
/// and `emergency_24h` may only be promoted from false to true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicRecord {
    pub clinic_id: String,
    pub name: String,
    pub address: String,
    pub phone_regular: String,
    pub phone_emergency: String,
    pub whatsapp: String,
    pub opening_hours: String,
    pub emergency_24h: bool,
    pub website_url: String,
    pub applemap_url: String,
    pub latitude: String,
    pub longitude: String,
    pub rating: String,
    pub google_place_id: String,
    pub photo_reference: String,
    /// Derived from `photo_reference` and the configured credential;
    /// never written back to the CSV.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub photo_url: String,
}

impl ClinicRecord {
    /// Parse one CSV row. Returns `None` for rows shorter than
    /// [`MIN_FIELDS`]; the loader logs and drops those.
    pub fn from_csv_row(row: &csv::StringRecord) -> Option<Self> {
        if row.len() < MIN_FIELDS {
            return None;
        }
        let field = |i: usize| row.get(i).map(str::trim).unwrap_or_default().to_string();

        Some(Self {
            clinic_id: field(0),
            name: field(1),
            address: field(2),
            phone_regular: field(3),
            phone_emergency: field(4),
            whatsapp: field(5),
            opening_hours: field(6),
            emergency_24h: row.get(7).is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            website_url: field(8),
            applemap_url: field(9),
            latitude: field(10),
            longitude: field(11),
            rating: field(12),
            google_place_id: field(13),
            photo_reference: field(14),
            photo_url: String::new(),
        })
    }

    /// Serialize into the 15-column CSV row shape (derived fields omitted).
    pub fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.clinic_id.clone(),
            self.name.clone(),
            self.address.clone(),
            self.phone_regular.clone(),
            self.phone_emergency.clone(),
            self.whatsapp.clone(),
            self.opening_hours.clone(),
            if self.emergency_24h { "TRUE".into() } else { "FALSE".into() },
            self.website_url.clone(),
            self.applemap_url.clone(),
            self.latitude.clone(),
            self.longitude.clone(),
            self.rating.clone(),
            self.google_place_id.clone(),
            self.photo_reference.clone(),
        ]
    }

    /// Whether the record already carries everything enrichment would add.
    pub fn is_enriched(&self) -> bool {
        !self.google_place_id.is_empty()
            && !self.latitude.is_empty()
            && !self.longitude.is_empty()
            && !self.photo_reference.is_empty()
    }

    /// Merge fetched place details into the record, filling empty fields
    /// only. Non-empty values are never overwritten. The 24-hour flag is the
    /// one exception to fill-only: it is promoted to true when any fetched
    /// opening-hours line matches the 24-hour pattern, and never demoted.
    pub fn merge_details(&mut self, place_id: &str, details: &PlaceDetails) {
        if self.google_place_id.is_empty() {
            self.google_place_id = place_id.to_string();
        }
        if self.latitude.is_empty()
            && let Some(lat) = details.latitude
        {
            self.latitude = format!("{lat:.6}");
        }
        if self.longitude.is_empty()
            && let Some(lng) = details.longitude
        {
            self.longitude = format!("{lng:.6}");
        }
        if self.rating.is_empty()
            && let Some(rating) = details.rating
        {
            self.rating = format!("{rating:.1}");
        }
        if self.phone_regular.is_empty()
            && let Some(phone) = &details.phone
        {
            self.phone_regular = phone.clone();
        }
        if self.website_url.is_empty()
            && let Some(website) = &details.website
        {
            self.website_url = website.clone();
        }
        if self.opening_hours.is_empty() && !details.opening_hours.is_empty() {
            self.opening_hours = details.opening_hours.join("; ");
        }
        if self.photo_reference.is_empty()
            && let Some(reference) = &details.photo_reference
        {
            self.photo_reference = reference.clone();
        }
        if details.opening_hours.iter().any(|line| is_24h_line(line)) {
            self.emergency_24h = true;
        }
        if self.applemap_url.is_empty() && !self.name.is_empty() {
            self.applemap_url = apple_maps_url(&self.name);
        }
    }

    /// Derive the photo URL from the photo reference, once both the
    /// reference and the credential are available.
    pub fn refresh_photo_url(&mut self, api_key: &str) {
        if self.photo_url.is_empty() && !self.photo_reference.is_empty() {
            self.photo_url = format!(
                "https://places.googleapis.com/v1/{}/media?maxWidthPx=400&key={}",
                self.photo_reference, api_key
            );
        }
    }
}

fn is_24h_line(line: &str) -> bool {
    let line = line.to_lowercase();
    line.contains("open 24 hours") || line.contains("24-hour")
}

fn apple_maps_url(name: &str) -> String {
    format!("https://maps.apple.com/?q={}", name.replace(' ', "+"))
}
