//! Paginated, rate-limited place search provider adapter.

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::{PlacesClient, PlacesConfig};
pub use error::{DetailError, DetailUnavailable, ProviderError};
pub use source::{PlaceSource, SearchPage};
