//! The seam between the aggregator and a concrete search provider.

use std::time::Duration;

use async_trait::async_trait;
use placesweep_core::{BoundingBox, Candidate, PlaceDetail, PlaceId, Query};

use crate::error::{DetailError, ProviderError};

/// One bounded page of first-pass search hits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub candidates: Vec<Candidate>,
    /// Present when the provider has more results. Only valid after
    /// [`PlaceSource::page_token_delay`] has elapsed.
    pub next_page_token: Option<String>,
}

/// A paginated text-search provider with per-place detail lookup.
///
/// Implementations must not retry on failure: a failed call is reported to
/// the caller, who decides whether the run ends.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Fetches one page of candidates for `query`, scoped to `bounds`.
    ///
    /// Zero results is an empty page with no token, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport, quota or decoding failure.
    async fn search_page(
        &self,
        query: &Query,
        bounds: BoundingBox,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ProviderError>;

    /// Fetches the enriched record for one candidate.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::Unavailable`] when this one place cannot be
    /// resolved (unknown id, no location), and [`DetailError::Provider`] on
    /// transport, quota or decoding failure.
    async fn fetch_detail(&self, id: &PlaceId) -> Result<PlaceDetail, DetailError>;

    /// How long a continuation token needs before it becomes valid.
    fn page_token_delay(&self) -> Duration;
}
