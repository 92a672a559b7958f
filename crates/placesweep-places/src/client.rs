//! HTTP client for the Places v1 text-search and place-detail endpoints.
//!
//! Wraps `reqwest` with provider-specific error handling, API key and field
//! mask headers, and typed response decoding. Continuation tokens are paced:
//! the client remembers when each token was issued and holds a request that
//! presents it too early until the provider delay has elapsed.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use placesweep_core::{AppConfig, BoundingBox, PlaceDetail, PlaceId, Query};
use reqwest::{Client, StatusCode, Url};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{DetailError, DetailUnavailable, ProviderError};
use crate::source::{PlaceSource, SearchPage};
use crate::types::{
    ErrorEnvelope, SearchTextRequest, SearchTextResponse, WirePlace, DETAIL_FIELD_MASK,
    SEARCH_FIELD_MASK,
};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Connection settings for [`PlacesClient`].
#[derive(Clone)]
pub struct PlacesConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub page_size: u32,
    pub page_token_delay: Duration,
    pub language_code: Option<String>,
}

impl std::fmt::Debug for PlacesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("page_token_delay", &self.page_token_delay)
            .field("language_code", &self.language_code)
            .finish()
    }
}

impl From<&AppConfig> for PlacesConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            page_size: config.page_size,
            page_token_delay: Duration::from_millis(config.page_token_delay_ms),
            language_code: config.language_code.clone(),
        }
    }
}

/// Client for a Places v1 style provider.
///
/// Use [`PlacesClient::new`] with a full [`PlacesConfig`], pointing
/// `base_url` at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    page_size: u32,
    page_token_delay: Duration,
    language_code: Option<String>,
    /// When each outstanding continuation token was handed out.
    issued_tokens: Mutex<HashMap<String, Instant>>,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ProviderError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute hierarchical URL.
    pub fn new(config: &PlacesConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| ProviderError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidBaseUrl {
                base_url: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
            page_size: config.page_size,
            page_token_delay: config.page_token_delay,
            language_code: config.language_code.clone(),
            issued_tokens: Mutex::new(HashMap::new()),
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sleeps out whatever remains of the provider delay for `token`.
    async fn wait_for_token(&self, token: &str) {
        let issued_at = self.issued_tokens.lock().await.remove(token);
        if let Some(issued_at) = issued_at {
            let ready_at = issued_at + self.page_token_delay;
            if Instant::now() < ready_at {
                tracing::debug!(
                    wait_ms = ready_at.saturating_duration_since(Instant::now()).as_millis(),
                    "continuation token not yet valid; waiting"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
    }

    /// Records `token`, forgetting tokens whose delay has already passed.
    /// Presenting one of those needs no wait, and abandoned tokens would
    /// otherwise stay for the life of the client.
    async fn remember_token(&self, token: &str) {
        let now = Instant::now();
        let mut issued = self.issued_tokens.lock().await;
        issued.retain(|_, issued_at| {
            now.saturating_duration_since(*issued_at) < self.page_token_delay
        });
        issued.insert(token.to_owned(), now);
    }

    /// Maps a non-2xx response to the matching [`ProviderError`].
    async fn status_error(response: reqwest::Response, url: &Url) -> ProviderError {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return ProviderError::RateLimited { retry_after_secs };
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => ProviderError::Api {
                code: status.as_u16(),
                status: envelope.error.status,
                message: envelope.error.message,
            },
            Err(_) => ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            },
        }
    }

    /// A 404 or a record without a location only loses this one place;
    /// every other failure is a provider failure.
    async fn request_detail(&self, id: &PlaceId) -> Result<PlaceDetail, DetailError> {
        let url = self.endpoint(&["places", id.as_str()]);
        let mut request = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, DETAIL_FIELD_MASK);
        if let Some(lang) = &self.language_code {
            request = request.query(&[("languageCode", lang)]);
        }

        let response = request.send().await.map_err(ProviderError::from)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ErrorEnvelope>(&body).map_or_else(
                |_| "not found".to_string(),
                |envelope| format!("{}: {}", envelope.error.status, envelope.error.message),
            );
            return Err(DetailUnavailable::new(id, reason).into());
        }
        if !status.is_success() {
            return Err(Self::status_error(response, &url).await.into());
        }

        let body = response.text().await.map_err(ProviderError::from)?;
        let place = serde_json::from_str::<WirePlace>(&body).map_err(|e| {
            ProviderError::Deserialize {
                context: format!("place detail {id}"),
                source: e,
            }
        })?;
        place
            .into_detail()
            .ok_or_else(|| DetailUnavailable::new(id, "detail has no location").into())
    }
}

#[async_trait]
impl PlaceSource for PlacesClient {
    async fn search_page(
        &self,
        query: &Query,
        bounds: BoundingBox,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ProviderError> {
        if let Some(token) = page_token {
            self.wait_for_token(token).await;
        }

        let url = self.endpoint(&["places:searchText"]);
        let body = SearchTextRequest {
            text_query: query.as_str(),
            page_size: self.page_size,
            page_token,
            language_code: self.language_code.as_deref(),
            location_restriction: bounds.into(),
        };

        let response = self
            .client
            .post(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, SEARCH_FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response, &url).await);
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str::<SearchTextResponse>(&text).map_err(|e| {
            ProviderError::Deserialize {
                context: format!("searchText(query={query})"),
                source: e,
            }
        })?;

        let returned = parsed.places.len();
        let candidates: Vec<_> = parsed
            .places
            .into_iter()
            .filter_map(WirePlace::into_candidate)
            .collect();
        if candidates.len() < returned {
            tracing::debug!(
                query = %query,
                dropped = returned - candidates.len(),
                "skipped search hits without id or location"
            );
        }

        let next_page_token = parsed.next_page_token.filter(|t| !t.is_empty());
        if let Some(token) = &next_page_token {
            self.remember_token(token).await;
        }

        Ok(SearchPage {
            candidates,
            next_page_token,
        })
    }

    async fn fetch_detail(&self, id: &PlaceId) -> Result<PlaceDetail, DetailError> {
        self.request_detail(id).await.inspect_err(|e| {
            tracing::debug!(place_id = %id, error = %e, "place detail request failed");
        })
    }

    fn page_token_delay(&self) -> Duration {
        self.page_token_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> PlacesConfig {
        PlacesConfig {
            api_key: "test-key".to_owned(),
            base_url: base_url.to_owned(),
            timeout_secs: 5,
            user_agent: "placesweep-test/0.1".to_owned(),
            page_size: 20,
            page_token_delay: Duration::from_millis(2000),
            language_code: None,
        }
    }

    #[test]
    fn endpoint_appends_search_method_to_versioned_base() {
        let client = PlacesClient::new(&test_config("https://places.example.com/v1/")).unwrap();
        assert_eq!(
            client.endpoint(&["places:searchText"]).as_str(),
            "https://places.example.com/v1/places:searchText"
        );
    }

    #[test]
    fn endpoint_handles_base_without_trailing_slash() {
        let client = PlacesClient::new(&test_config("https://places.example.com/v1")).unwrap();
        assert_eq!(
            client.endpoint(&["places", "ChIJ1"]).as_str(),
            "https://places.example.com/v1/places/ChIJ1"
        );
    }

    #[test]
    fn endpoint_percent_encodes_place_ids() {
        let client = PlacesClient::new(&test_config("https://places.example.com/v1/")).unwrap();
        let url = client.endpoint(&["places", "a/b c"]);
        assert_eq!(url.path(), "/v1/places/a%2Fb%20c");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = PlacesClient::new(&test_config("not a url"));
        assert!(matches!(result, Err(ProviderError::InvalidBaseUrl { .. })));

        let result = PlacesClient::new(&test_config("mailto:someone@example.com"));
        assert!(matches!(result, Err(ProviderError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", test_config("https://places.example.com/v1/"));
        assert!(!rendered.contains("test-key"));
    }

    #[tokio::test(start_paused = true)]
    async fn early_token_use_waits_out_the_provider_delay() {
        let client = PlacesClient::new(&test_config("https://places.example.com/v1/")).unwrap();
        client.remember_token("tok").await;

        let start = Instant::now();
        client.wait_for_token("tok").await;
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_or_aged_tokens_do_not_wait() {
        let client = PlacesClient::new(&test_config("https://places.example.com/v1/")).unwrap();

        let start = Instant::now();
        client.wait_for_token("never-issued").await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        client.remember_token("tok").await;
        tokio::time::advance(Duration::from_millis(2500)).await;
        let start = Instant::now();
        client.wait_for_token("tok").await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_tokens_are_forgotten_once_valid() {
        let client = PlacesClient::new(&test_config("https://places.example.com/v1/")).unwrap();
        client.remember_token("abandoned").await;
        client.remember_token("fresh").await;
        assert_eq!(client.issued_tokens.lock().await.len(), 2);

        tokio::time::advance(Duration::from_millis(2000)).await;
        client.remember_token("next").await;

        let issued = client.issued_tokens.lock().await;
        assert_eq!(issued.len(), 1);
        assert!(issued.contains_key("next"));
    }
}
