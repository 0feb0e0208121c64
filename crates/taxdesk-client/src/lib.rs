//! # taxdesk-client: Typed Rust client for the taxdesk remote data store
//!
//! Provides typed access to the two collections the application reads and
//! writes:
//! - **Tax records**: list and full-record update
//! - **Countries**: list
//!
//! ## Architecture
//!
//! This crate is the only code that speaks HTTP. Everything above it sees
//! the remote store through [`taxdesk_core::RecordGateway`], which
//! [`GatewayClient`] implements.
//!
//! ## API Path Convention
//!
//! Both collections live directly under the base URL:
//! `{base_url}/{collection}` and `{base_url}/{collection}/{id}`.

pub mod config;
pub mod countries;
pub mod error;
pub mod records;
pub(crate) mod retry;

pub use config::GatewayConfig;
pub use error::GatewayError;

use std::time::Duration;

use serde::de::DeserializeOwned;
use taxdesk_core::{Country, RecordGateway, TaxRecord};
use url::Url;

/// Top-level gateway client. Holds one sub-client per collection.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    tax_records: records::TaxRecordClient,
    countries: countries::CountryClient,
}

impl GatewayClient {
    /// Create a new gateway client from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        tracing::debug!(base_url = %config.base_url, "gateway client ready");

        Ok(Self {
            tax_records: records::TaxRecordClient::new(
                http.clone(),
                config.base_url.clone(),
                config.records_resource,
            ),
            countries: countries::CountryClient::new(
                http,
                config.base_url,
                config.countries_resource,
            ),
        })
    }

    /// Access the tax-record collection client.
    pub fn tax_records(&self) -> &records::TaxRecordClient {
        &self.tax_records
    }

    /// Access the country collection client.
    pub fn countries(&self) -> &countries::CountryClient {
        &self.countries
    }
}

impl RecordGateway for GatewayClient {
    type Error = GatewayError;

    async fn fetch_tax_records(&self) -> Result<Vec<TaxRecord>, GatewayError> {
        self.tax_records.list().await
    }

    async fn fetch_countries(&self) -> Result<Vec<Country>, GatewayError> {
        self.countries.list().await
    }

    async fn update_tax_record(&self, record: &TaxRecord) -> Result<TaxRecord, GatewayError> {
        self.tax_records.update(record).await
    }
}

/// Append path segments to a base URL (which always ends in `/`).
pub(crate) fn resource_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Reject non-2xx responses, then decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<T, GatewayError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::Api {
            endpoint: endpoint.to_string(),
            status,
            body,
        });
    }

    resp.json().await.map_err(|e| GatewayError::Deserialization {
        endpoint: endpoint.to_string(),
        source: e,
    })
}
