#![deny(missing_docs)]

//! # taxdesk-core: Foundational Types for taxdesk
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`RecordId`] cannot be passed
//!    where a [`CountryId`] is expected.
//!
//! 2. **Lossless records.** [`TaxRecord`] and [`Country`] keep every field the
//!    remote API sends, including ones this crate does not model, so an update
//!    writes back exactly what was read apart from the edited fields.
//!
//! 3. **One seam to the network.** Everything that talks to the remote data
//!    store does so through the [`RecordGateway`] trait.
//!
//! 4. **[`TaxdeskError`] hierarchy.** Structured errors with `thiserror`; no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod date;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod record;

// Re-export primary types at crate root for ergonomic imports.
pub use date::{format_request_date, gender_tag_style};
pub use error::{StateTransitionError, TaxdeskError, ValidationError};
pub use gateway::RecordGateway;
pub use identity::{CountryId, RecordId};
pub use record::{Country, Draft, DraftField, TaxRecord};
