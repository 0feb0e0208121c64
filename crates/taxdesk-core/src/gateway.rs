//! # Remote Data Gateway
//!
//! The trait every caller uses to reach the remote data store. The
//! production implementation lives in `taxdesk-client`; tests substitute
//! in-memory fakes.
//!
//! ## Operations
//!
//! | Operation | Remote call |
//! |-----------|-------------|
//! | [`RecordGateway::fetch_tax_records`] | `GET /tax-records` |
//! | [`RecordGateway::fetch_countries`] | `GET /countries` |
//! | [`RecordGateway::update_tax_record`] | `PUT /tax-records/{id}` |

use std::future::Future;

use crate::record::{Country, TaxRecord};

/// Access to the two remote collections.
///
/// Implementations must treat a non-success response as an error, and
/// `update_tax_record` must return the server's canonical record rather
/// than echoing the payload it was given.
pub trait RecordGateway: Send + Sync {
    /// Failure type for every operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List every tax record.
    fn fetch_tax_records(
        &self,
    ) -> impl Future<Output = Result<Vec<TaxRecord>, Self::Error>> + Send;

    /// List every country.
    fn fetch_countries(
        &self,
    ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send;

    /// Replace the record with `record.id` and return the stored result.
    fn update_tax_record(
        &self,
        record: &TaxRecord,
    ) -> impl Future<Output = Result<TaxRecord, Self::Error>> + Send;
}
