//! # Edit Workflow State Machine
//!
//! The modal that edits one record's name and country.
//!
//! ## Transitions
//!
//! ```text
//! CLOSED ─open()──▶ OPEN ─begin_submit()──▶ SAVING ─complete_save()──▶ CLOSED
//!    ▲               │  ▲                      │
//!    └───cancel()────┘  └─────fail_save()──────┘
//! ```
//!
//! `begin_submit()` on an invalid draft stays in OPEN. The draft survives a
//! failed save untouched, and the record store is only written by
//! `complete_save()`. Calls that do not apply to the current phase return
//! [`StateTransitionError::InvalidTransition`] and change nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use taxdesk_core::{Country, Draft, DraftField, StateTransitionError, TaxRecord, ValidationError};

use crate::store::{MergeOutcome, RecordStore};

/// Phase of the edit workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditPhase {
    /// No modal.
    #[default]
    Closed,
    /// Modal showing a draft.
    Open,
    /// Update request in flight.
    Saving,
}

impl EditPhase {
    /// Canonical phase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
            Self::Saving => "SAVING",
        }
    }
}

impl fmt::Display for EditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from [`EditWorkflow::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The workflow was not in the phase the call requires.
    #[error(transparent)]
    Transition(#[from] StateTransitionError),
    /// The draft failed the presence check. The workflow stays open.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Data that lives exactly as long as the modal.
#[derive(Debug, Clone, PartialEq)]
struct EditSession {
    original: TaxRecord,
    draft: Draft,
    country_picker_open: bool,
    last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum State {
    #[default]
    Closed,
    Open(EditSession),
    Saving(EditSession),
}

/// The single edit modal.
#[derive(Debug, Clone, Default)]
pub struct EditWorkflow {
    state: State,
}

impl EditWorkflow {
    /// A closed workflow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> EditPhase {
        match self.state {
            State::Closed => EditPhase::Closed,
            State::Open(_) => EditPhase::Open,
            State::Saving(_) => EditPhase::Saving,
        }
    }

    /// The working draft, while the modal is open or saving.
    pub fn draft(&self) -> Option<&Draft> {
        self.session().map(|s| &s.draft)
    }

    /// Snapshot of the record the modal was opened with.
    pub fn original(&self) -> Option<&TaxRecord> {
        self.session().map(|s| &s.original)
    }

    /// Whether the country picker inside the modal is expanded.
    pub fn is_country_picker_open(&self) -> bool {
        self.session().is_some_and(|s| s.country_picker_open)
    }

    /// Message from the last rejected submit or failed save, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.session().and_then(|s| s.last_error.as_deref())
    }

    /// Open the modal on `record`. CLOSED → OPEN.
    pub fn open(&mut self, record: &TaxRecord) -> Result<(), StateTransitionError> {
        if !matches!(self.state, State::Closed) {
            return Err(self.invalid(EditPhase::Open, "another record is already being edited"));
        }
        self.state = State::Open(EditSession {
            original: record.clone(),
            draft: Draft::from_record(record),
            country_picker_open: false,
            last_error: None,
        });
        tracing::debug!(id = %record.id, "edit workflow opened");
        Ok(())
    }

    /// Overwrite one draft field. Never touches the record store.
    pub fn update_draft_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), StateTransitionError> {
        let session = self.open_session_mut("edit the draft")?;
        session.draft.set(field, value);
        Ok(())
    }

    /// Expand or collapse the country picker.
    pub fn toggle_country_picker(&mut self) -> Result<(), StateTransitionError> {
        let session = self.open_session_mut("toggle the country picker")?;
        session.country_picker_open = !session.country_picker_open;
        Ok(())
    }

    /// Set the draft country and collapse the picker.
    pub fn select_country_in_draft(&mut self, name: &str) -> Result<(), StateTransitionError> {
        let session = self.open_session_mut("select a country")?;
        session.draft.country = name.to_string();
        session.country_picker_open = false;
        Ok(())
    }

    /// Edit action on a country in the picker.
    ///
    /// Countries are read-only in this application; this is the hook where
    /// country editing would go. It only records the request.
    pub fn edit_country(&self, country: &Country) -> Result<(), StateTransitionError> {
        if !matches!(self.state, State::Open(_)) {
            return Err(self.invalid(
                EditPhase::Open,
                "cannot edit a country without an open modal",
            ));
        }
        tracing::info!(
            country = %country.name,
            id = %country.id,
            "edit country requested; not supported"
        );
        Ok(())
    }

    /// Validate the draft and, if it passes, move to SAVING. OPEN → SAVING.
    ///
    /// Returns the update payload: the original record with the draft's name
    /// and country. On a validation failure the workflow stays OPEN with the
    /// message available from [`EditWorkflow::last_error`].
    pub fn begin_submit(&mut self) -> Result<TaxRecord, EditError> {
        let session = self.open_session_mut("submit")?;
        if let Err(e) = session.draft.validate() {
            session.last_error = Some(e.to_string());
            tracing::debug!(reason = %e, "draft rejected");
            return Err(e.into());
        }
        let payload = session.original.with_draft(&session.draft);
        session.last_error = None;

        if let State::Open(session) = std::mem::take(&mut self.state) {
            self.state = State::Saving(session);
        }
        tracing::debug!(id = %payload.id, "edit workflow saving");
        Ok(payload)
    }

    /// Merge the server's record into `store` and close. SAVING → CLOSED.
    pub fn complete_save(
        &mut self,
        saved: TaxRecord,
        store: &mut RecordStore,
    ) -> Result<MergeOutcome, StateTransitionError> {
        if !matches!(self.state, State::Saving(_)) {
            return Err(self.invalid(EditPhase::Closed, "no save is in flight"));
        }
        let outcome = store.apply_update(saved);
        self.state = State::Closed;
        tracing::debug!(?outcome, "edit workflow closed after save");
        Ok(outcome)
    }

    /// Return to the draft after a failed save. SAVING → OPEN.
    pub fn fail_save(&mut self, message: impl Into<String>) -> Result<(), StateTransitionError> {
        match std::mem::take(&mut self.state) {
            State::Saving(mut session) => {
                session.last_error = Some(message.into());
                self.state = State::Open(session);
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid(EditPhase::Open, "no save is in flight"))
            }
        }
    }

    /// Discard the draft. OPEN → CLOSED.
    pub fn cancel(&mut self) -> Result<(), StateTransitionError> {
        if !matches!(self.state, State::Open(_)) {
            return Err(self.invalid(EditPhase::Closed, "only an open draft can be cancelled"));
        }
        self.state = State::Closed;
        tracing::debug!("edit workflow cancelled");
        Ok(())
    }

    fn session(&self) -> Option<&EditSession> {
        match &self.state {
            State::Closed => None,
            State::Open(s) | State::Saving(s) => Some(s),
        }
    }

    fn open_session_mut(&mut self, action: &str) -> Result<&mut EditSession, StateTransitionError> {
        let phase = self.phase();
        match &mut self.state {
            State::Open(session) => Ok(session),
            _ => Err(StateTransitionError::InvalidTransition {
                from: phase.to_string(),
                to: EditPhase::Open.to_string(),
                reason: format!("cannot {action} while {phase}"),
            }),
        }
    }

    fn invalid(&self, to: EditPhase, reason: &str) -> StateTransitionError {
        StateTransitionError::InvalidTransition {
            from: self.phase().to_string(),
            to: to.to_string(),
            reason: reason.to_string(),
        }
    }
}
