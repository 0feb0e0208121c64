#![deny(missing_docs)]

//! # taxdesk-state: Interactive State for taxdesk
//!
//! Everything between the remote gateway and the screen:
//!
//! - [`store`]: authoritative in-memory copy of records and countries.
//! - [`filter`]: distinct country options, selection toggling, visible subset.
//! - [`edit`]: the edit-modal state machine (CLOSED / OPEN / SAVING).
//! - [`table`]: pure projection into table and modal views.
//! - [`session`]: sequencing of load, filter, edit, and save, with
//!   user-facing notices.
//!
//! Derived views are recomputed from scratch on every call. Nothing caches
//! a filtered or rendered result, so nothing can go stale.

pub mod edit;
pub mod filter;
pub mod session;
pub mod store;
pub mod table;

pub use edit::{EditError, EditPhase, EditWorkflow};
pub use filter::{
    available_country_names, toggle_country, visible_records, CountryFilter, CountrySelection,
    FilterError,
};
pub use session::{LoadState, Notice, Session, SessionError};
pub use store::{MergeOutcome, RecordStore};
pub use table::{present, present_modal, Cell, Column, ModalView, TableRow, TableView};
