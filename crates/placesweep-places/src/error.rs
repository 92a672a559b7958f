use placesweep_core::PlaceId;
use thiserror::Error;

/// Transport, quota or decoding failure on a search page or detail lookup.
/// Ends the current run.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider error {code} {status}: {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid provider base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Detail lookup failure for a single place. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("detail unavailable for {id}: {reason}")]
pub struct DetailUnavailable {
    pub id: PlaceId,
    pub reason: String,
}

impl DetailUnavailable {
    #[must_use]
    pub fn new(id: &PlaceId, reason: impl Into<String>) -> Self {
        Self {
            id: id.clone(),
            reason: reason.into(),
        }
    }
}

/// Failure of a single detail lookup.
///
/// `Unavailable` drops that one candidate; `Provider` ends the run the same
/// way a failed search page does.
#[derive(Debug, Error)]
pub enum DetailError {
    #[error(transparent)]
    Unavailable(#[from] DetailUnavailable),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
