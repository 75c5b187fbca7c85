use crate::prelude::*;

pub mod api;
pub mod limit;

pub use api::{ApiError, InventoryApi, Rebrickable};
pub use limit::RateLimiter;

/// Rebrickable API v3 base URL.
pub const BASE_URL: &str = "https://rebrickable.com/api/v3";

/// Rebrickable configuration from environment variables
#[derive(Debug, Clone)]
pub struct RebrickableConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_token: String,
}

impl RebrickableConfig {
    /// Load configuration from environment variables
    ///
    /// Uses REBRICKABLE_BASE_URL with the public API default as fallback.
    /// The user token names the account whose part lists are operated on.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: std::env::var("REBRICKABLE_BASE_URL")
                .unwrap_or_else(|_| BASE_URL.to_string()),
            api_key: std::env::var("REBRICKABLE_API_KEY").map_err(|_| {
                Error::Config("REBRICKABLE_API_KEY environment variable not set".to_string())
            })?,
            user_token: std::env::var("REBRICKABLE_USER_TOKEN").map_err(|_| {
                Error::Config("REBRICKABLE_USER_TOKEN environment variable not set".to_string())
            })?,
        })
    }
}

/// Create an HTTP client with the Rebrickable `key` auth header preset
pub fn create_authenticated_client(config: &RebrickableConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&f!("key {}", config.api_key))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}
