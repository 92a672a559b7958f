use placesweep_places::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// No active region or an empty query. Raised before any provider call.
    #[error("invalid search invocation: {0}")]
    InvalidInvocation(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },
}
