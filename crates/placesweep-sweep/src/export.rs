//! Flat rows for handing the result set to a download sink.

use placesweep_core::PlaceResult;
use serde::Serialize;

/// One exported place: id, the query that found it, and the detail columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub place_id: String,
    pub query: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f32>,
    pub rating_count: Option<u32>,
    /// Category tags joined with `", "`.
    pub categories: String,
    pub photo_ref: Option<String>,
    pub url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&PlaceResult> for ExportRow {
    fn from(result: &PlaceResult) -> Self {
        let d = &result.detail;
        Self {
            place_id: result.id.to_string(),
            query: result.query.to_string(),
            name: d.name.clone(),
            address: d.formatted_address.clone(),
            phone: d.phone.clone(),
            website: d.website.clone(),
            rating: d.rating,
            rating_count: d.rating_count,
            categories: d.categories.join(", "),
            photo_ref: d.photo_ref.clone(),
            url: d.url.clone(),
            latitude: d.location.lat,
            longitude: d.location.lng,
        }
    }
}

/// One row per result, in display order.
#[must_use]
pub fn export_rows(results: &[PlaceResult]) -> Vec<ExportRow> {
    results.iter().map(ExportRow::from).collect()
}
