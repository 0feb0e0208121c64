//! # Error Hierarchy
//!
//! Structured error types shared by the taxdesk crates, built with
//! `thiserror`. Network errors live with the client crate; this module
//! covers the domain: invalid identifiers, rejected drafts, and illegal
//! edit-workflow transitions.

use thiserror::Error;

/// Top-level error type for taxdesk domain operations.
#[derive(Error, Debug)]
pub enum TaxdeskError {
    /// Domain primitive or draft validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Edit workflow transition violation.
    #[error("state transition error: {0}")]
    StateTransition(#[from] StateTransitionError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors during state machine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    /// The attempted transition is not valid from the current state.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current state name.
        from: String,
        /// The attempted target state name.
        to: String,
        /// Human-readable reason for the rejection.
        reason: String,
    },
}

/// Validation errors for identifiers and edit drafts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifiers assigned by the remote store are never empty.
    #[error("invalid {kind} identifier: must be non-empty")]
    EmptyIdentifier {
        /// Which identifier kind was rejected ("record", "country").
        kind: &'static str,
    },

    /// A required draft field is empty after trimming whitespace.
    #[error("{field} is required")]
    MissingRequiredField {
        /// The draft field that was blank.
        field: &'static str,
    },
}
