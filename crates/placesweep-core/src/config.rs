use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1/";
const MAX_PAGE_SIZE: u32 = 20;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let api_key = require("PLACESWEEP_API_KEY")?;
    let base_url = or_default("PLACESWEEP_BASE_URL", DEFAULT_BASE_URL);
    let log_level = or_default("PLACESWEEP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PLACESWEEP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PLACESWEEP_USER_AGENT", "placesweep/0.1 (area-search)");

    let page_size = parse_u32("PLACESWEEP_PAGE_SIZE", "20")?;
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACESWEEP_PAGE_SIZE".to_string(),
            reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }

    let page_token_delay_ms = parse_u64("PLACESWEEP_PAGE_TOKEN_DELAY_MS", "2000")?;

    let max_pages = parse_usize("PLACESWEEP_MAX_PAGES", "10")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACESWEEP_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let language_code = lookup("PLACESWEEP_LANGUAGE_CODE")
        .ok()
        .filter(|v| !v.trim().is_empty());

    Ok(AppConfig {
        api_key,
        base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        page_size,
        page_token_delay_ms,
        max_pages,
        language_code,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
