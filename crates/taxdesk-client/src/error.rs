//! Gateway client error types.

/// Errors from remote data store calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The remote store returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not the expected JSON shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl GatewayError {
    /// The `METHOD /path` the failing call targeted, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Http { endpoint, .. }
            | Self::Api { endpoint, .. }
            | Self::Deserialization { endpoint, .. } => Some(endpoint),
            Self::Config(_) => None,
        }
    }
}
