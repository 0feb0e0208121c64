//! Gateway client configuration.
//!
//! Configures the base URL of the remote data store and the names of its
//! two collections. Defaults point at the hosted mock API. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;

/// Hosted mock API serving both collections.
pub const DEFAULT_BASE_URL: &str = "https://685013d7e7c42cfd17974a33.mockapi.io";

/// Collection name of the tax records on the hosted mock API.
pub const DEFAULT_RECORDS_RESOURCE: &str = "taxes";

/// Collection name of the countries.
pub const DEFAULT_COUNTRIES_RESOURCE: &str = "countries";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the remote data store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL; always ends in `/`.
    pub base_url: Url,
    /// Path segment of the tax-record collection.
    pub records_resource: String,
    /// Path segment of the country collection.
    pub countries_resource: String,
    /// Request timeout in seconds. Applies to every request, so no call can
    /// hang indefinitely.
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TAXDESK_API_URL` (default: [`DEFAULT_BASE_URL`])
    /// - `TAXDESK_RECORDS_RESOURCE` (default: `taxes`)
    /// - `TAXDESK_COUNTRIES_RESOURCE` (default: `countries`)
    /// - `TAXDESK_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("TAXDESK_API_URL", DEFAULT_BASE_URL)?,
            records_resource: env_resource("TAXDESK_RECORDS_RESOURCE", DEFAULT_RECORDS_RESOURCE)?,
            countries_resource: env_resource(
                "TAXDESK_COUNTRIES_RESOURCE",
                DEFAULT_COUNTRIES_RESOURCE,
            )?,
            timeout_secs: std::env::var("TAXDESK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Default collections and timeout against an explicit base URL.
    pub fn for_base_url(raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", raw)?,
            records_resource: DEFAULT_RECORDS_RESOURCE.to_string(),
            countries_resource: DEFAULT_COUNTRIES_RESOURCE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url("base_url", raw)?;
        Ok(self)
    }

    /// Replace the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_base_url(var, &raw)
}

fn env_resource(var: &str, default: &str) -> Result<String, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyResource(var.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parse a base URL and make sure its path ends in `/`, so joining a
/// collection name appends rather than replaces the last segment.
fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            name.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{0} must name a non-empty collection")]
    EmptyResource(String),
}
