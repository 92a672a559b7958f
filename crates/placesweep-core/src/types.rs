//! Domain types shared by the adapter, the aggregator and the CLI.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// Provider-assigned place identifier. Stable key of a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("query is empty")]
pub struct QueryError;

/// User-supplied search text, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// # Errors
    ///
    /// Returns [`QueryError`] when `raw` is empty or whitespace only.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Query {
    type Error = QueryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

/// Raw first-pass search hit. Only used to decide inclusion and to request
/// detail; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: PlaceId,
    pub name: String,
    pub location: LatLng,
    pub address: Option<String>,
}

/// Enriched record for a single place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub name: String,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f32>,
    pub rating_count: Option<u32>,
    /// Provider category tags, e.g. `cafe`, `bakery`.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Opaque provider photo reference.
    pub photo_ref: Option<String>,
    /// Canonical external URL of the place (e.g. its maps page).
    pub url: Option<String>,
    pub location: LatLng,
}

/// A detail accepted into the accumulated result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: PlaceId,
    /// The query of the run that first inserted this place.
    pub query: Query,
    pub detail: PlaceDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_trimmed() {
        let q = Query::parse("  cafe \n").unwrap();
        assert_eq!(q.as_str(), "cafe");
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(Query::parse(""), Err(QueryError));
        assert_eq!(Query::parse(" \t "), Err(QueryError));
    }

    #[test]
    fn query_deserialization_applies_the_same_rules() {
        let q: Query = serde_json::from_str(r#"" bakery ""#).unwrap();
        assert_eq!(q.as_str(), "bakery");
        assert!(serde_json::from_str::<Query>(r#""   ""#).is_err());
    }

    #[test]
    fn place_id_serializes_as_plain_string() {
        let id = PlaceId::new("ChIJ123");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""ChIJ123""#);
    }
}
