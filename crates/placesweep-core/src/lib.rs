pub mod app_config;
pub mod config;
pub mod geo;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{contains, BoundingBox, GeometryError, LatLng, Region};
pub use types::{Candidate, PlaceDetail, PlaceId, PlaceResult, Query, QueryError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
