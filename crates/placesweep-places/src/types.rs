//! Wire types for the Places v1 `searchText` and place-detail endpoints.

use placesweep_core::{BoundingBox, Candidate, LatLng, PlaceDetail, PlaceId};
use serde::{Deserialize, Serialize};

/// Field mask for `places:searchText`: only what candidate filtering needs.
pub(crate) const SEARCH_FIELD_MASK: &str =
    "places.id,places.displayName,places.formattedAddress,places.location,nextPageToken";

/// Field mask for `places/{id}`.
pub(crate) const DETAIL_FIELD_MASK: &str = "id,displayName,formattedAddress,nationalPhoneNumber,\
internationalPhoneNumber,websiteUri,rating,userRatingCount,types,photos,googleMapsUri,location";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<WireLatLng> for LatLng {
    fn from(w: WireLatLng) -> Self {
        LatLng::new(w.latitude, w.longitude)
    }
}

impl From<LatLng> for WireLatLng {
    fn from(p: LatLng) -> Self {
        Self {
            latitude: p.lat,
            longitude: p.lng,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Rectangle {
    pub low: WireLatLng,
    pub high: WireLatLng,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationRestriction {
    pub rectangle: Rectangle,
}

impl From<BoundingBox> for LocationRestriction {
    fn from(b: BoundingBox) -> Self {
        Self {
            rectangle: Rectangle {
                low: b.south_west().into(),
                high: b.north_east().into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest<'a> {
    pub text_query: &'a str,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<&'a str>,
    pub location_restriction: LocationRestriction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePhoto {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePlace {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<WireLatLng>,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website_uri: Option<String>,
    pub rating: Option<f32>,
    pub user_rating_count: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<WirePhoto>,
    pub google_maps_uri: Option<String>,
}

impl WirePlace {
    fn display_name(&self) -> String {
        self.display_name
            .as_ref()
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    /// Candidates without an id or a location cannot be filtered and are dropped.
    #[must_use]
    pub fn into_candidate(self) -> Option<Candidate> {
        let name = self.display_name();
        Some(Candidate {
            id: PlaceId::new(self.id?),
            name,
            location: self.location?.into(),
            address: self.formatted_address,
        })
    }

    /// A detail without a location is unusable as a result.
    #[must_use]
    pub fn into_detail(self) -> Option<PlaceDetail> {
        let name = self.display_name();
        Some(PlaceDetail {
            name,
            formatted_address: self.formatted_address,
            phone: self
                .national_phone_number
                .or(self.international_phone_number),
            website: self.website_uri,
            rating: self.rating,
            rating_count: self.user_rating_count,
            categories: self.types,
            photo_ref: self.photos.into_iter().next().map(|p| p.name),
            url: self.google_maps_uri,
            location: self.location?.into(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<WirePlace>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_response_has_no_places_and_no_token() {
        let parsed: SearchTextResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.places.is_empty());
        assert!(parsed.next_page_token.is_none());
    }

    #[test]
    fn place_without_location_is_not_a_candidate() {
        let place: WirePlace = serde_json::from_value(serde_json::json!({
            "id": "A",
            "displayName": { "text": "Cafe A" }
        }))
        .unwrap();
        assert!(place.into_candidate().is_none());
    }

    #[test]
    fn detail_prefers_national_phone_and_first_photo() {
        let place: WirePlace = serde_json::from_value(serde_json::json!({
            "id": "A",
            "displayName": { "text": "Cafe A", "languageCode": "en" },
            "formattedAddress": "1 Main St",
            "location": { "latitude": 5.0, "longitude": 5.0 },
            "nationalPhoneNumber": "(555) 010-0000",
            "internationalPhoneNumber": "+1 555-010-0000",
            "types": ["cafe", "food"],
            "photos": [{ "name": "places/A/photos/p1" }, { "name": "places/A/photos/p2" }],
            "googleMapsUri": "https://maps.example.com/?cid=1"
        }))
        .unwrap();
        let detail = place.into_detail().unwrap();
        assert_eq!(detail.name, "Cafe A");
        assert_eq!(detail.phone.as_deref(), Some("(555) 010-0000"));
        assert_eq!(detail.photo_ref.as_deref(), Some("places/A/photos/p1"));
        assert_eq!(detail.categories, vec!["cafe", "food"]);
        assert_eq!(detail.location, LatLng::new(5.0, 5.0));
        assert!(detail.rating.is_none());
    }

    #[test]
    fn search_request_serializes_rectangle_restriction() {
        let bounds = BoundingBox {
            south: 1.0,
            west: 2.0,
            north: 3.0,
            east: 4.0,
        };
        let body = serde_json::to_value(SearchTextRequest {
            text_query: "cafe",
            page_size: 20,
            page_token: None,
            language_code: None,
            location_restriction: bounds.into(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "textQuery": "cafe",
                "pageSize": 20,
                "locationRestriction": {
                    "rectangle": {
                        "low": { "latitude": 1.0, "longitude": 2.0 },
                        "high": { "latitude": 3.0, "longitude": 4.0 }
                    }
                }
            })
        );
    }
}
