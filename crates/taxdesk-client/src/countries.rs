//! Typed client for the country collection.

use taxdesk_core::Country;
use url::Url;

use crate::error::GatewayError;
use crate::retry::Backoff;
use crate::{read_json, resource_url};

/// Client for the country collection. Read-only: countries are never
/// mutated by this application.
#[derive(Debug, Clone)]
pub struct CountryClient {
    http: reqwest::Client,
    base_url: Url,
    resource: String,
}

impl CountryClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, resource: String) -> Self {
        Self {
            http,
            base_url,
            resource,
        }
    }

    /// List every country.
    ///
    /// Calls `GET {base_url}/{collection}`.
    pub async fn list(&self) -> Result<Vec<Country>, GatewayError> {
        let endpoint = format!("GET /{}", self.resource);
        let url = resource_url(&self.base_url, &[&self.resource]);
        tracing::debug!(%url, "listing countries");

        let resp = Backoff::GATEWAY
            .send(&endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| GatewayError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        read_json(resp, &endpoint).await
    }
}
