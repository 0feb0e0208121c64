//! Typed client for the tax-record collection.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/{collection}` | List every record |
//! | PUT    | `/{collection}/{id}` | Replace one record, returns the stored record |

use taxdesk_core::TaxRecord;
use url::Url;

use crate::error::GatewayError;
use crate::retry::Backoff;
use crate::{read_json, resource_url};

/// Client for the tax-record collection.
#[derive(Debug, Clone)]
pub struct TaxRecordClient {
    http: reqwest::Client,
    base_url: Url,
    resource: String,
}

impl TaxRecordClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, resource: String) -> Self {
        Self {
            http,
            base_url,
            resource,
        }
    }

    /// List every tax record.
    ///
    /// Calls `GET {base_url}/{collection}`.
    pub async fn list(&self) -> Result<Vec<TaxRecord>, GatewayError> {
        let endpoint = format!("GET /{}", self.resource);
        let url = resource_url(&self.base_url, &[&self.resource]);
        tracing::debug!(%url, "listing tax records");

        let resp = Backoff::GATEWAY
            .send(&endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| GatewayError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        read_json(resp, &endpoint).await
    }

    /// Replace a tax record with `record` and return the server's copy.
    ///
    /// Calls `PUT {base_url}/{collection}/{id}` with the full record as the
    /// JSON body. The returned record, not the payload, is authoritative.
    pub async fn update(&self, record: &TaxRecord) -> Result<TaxRecord, GatewayError> {
        let endpoint = format!("PUT /{}/{}", self.resource, record.id);
        let url = resource_url(&self.base_url, &[&self.resource, record.id.as_str()]);
        tracing::debug!(%url, id = %record.id, "updating tax record");

        let resp = Backoff::GATEWAY
            .send(&endpoint, || self.http.put(url.clone()).json(record).send())
            .await
            .map_err(|e| GatewayError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        read_json(resp, &endpoint).await
    }
}
