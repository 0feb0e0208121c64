//! # Session
//!
//! Glue between the remote gateway and the interactive state: loads the
//! store, routes filter and edit interactions, derives the table after
//! every change, and turns I/O failures into user-facing [`Notice`]s.
//!
//! All I/O failures are caught here, where the I/O starts. State is either
//! fully updated or left exactly as it was: a failed load leaves the store
//! empty, a failed save leaves the store untouched and the draft open.

use std::fmt;

use taxdesk_core::{CountryId, DraftField, RecordGateway, RecordId, StateTransitionError, TaxRecord};

use crate::edit::{EditError, EditWorkflow};
use crate::filter::{available_country_names, visible_records, CountryFilter, FilterError};
use crate::store::{MergeOutcome, RecordStore};
use crate::table::{present, present_modal, ModalView, TableView};

/// Progress of the initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Not started.
    #[default]
    Idle,
    /// Both fetches in flight; the loading indicator is shown.
    Loading,
    /// Store populated.
    Loaded,
    /// A fetch failed; the store is empty.
    Failed,
}

/// A user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The initial load failed.
    LoadFailed,
    /// An update request failed.
    SaveFailed,
    /// The draft failed the presence check.
    ValidationFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoadFailed => "Failed to load data",
            Self::SaveFailed => "Failed to save changes",
            Self::ValidationFailed => "Name and country are required",
        })
    }
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A fetch failed during the initial load.
    #[error("failed to load data: {0}")]
    Load(String),
    /// The update request failed.
    #[error("failed to save changes: {0}")]
    Save(String),
    /// Edit workflow rejection (validation or phase).
    #[error(transparent)]
    Edit(#[from] EditError),
    /// Operation not valid in the current state.
    #[error(transparent)]
    Transition(#[from] StateTransitionError),
    /// Filter dropdown rejection.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// No stored record has this id.
    #[error("no record with id {0}")]
    UnknownRecord(RecordId),
    /// No stored country has this id.
    #[error("no country with id {0}")]
    UnknownCountry(CountryId),
}

/// One user's view of the remote data.
#[derive(Debug)]
pub struct Session<G> {
    gateway: G,
    store: RecordStore,
    filter: CountryFilter,
    edit: EditWorkflow,
    load_state: LoadState,
    notices: Vec<Notice>,
}

impl<G: RecordGateway> Session<G> {
    /// A session with an empty store that has not loaded yet.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            store: RecordStore::new(),
            filter: CountryFilter::new(),
            edit: EditWorkflow::new(),
            load_state: LoadState::Idle,
            notices: Vec::new(),
        }
    }

    /// The gateway this session talks to.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Read-only store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Filter state.
    pub fn filter(&self) -> &CountryFilter {
        &self.filter
    }

    /// Edit workflow state.
    pub fn edit(&self) -> &EditWorkflow {
        &self.edit
    }

    /// Progress of the initial load.
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Fetch both collections concurrently and populate the store.
    ///
    /// Either fetch failing fails the load: the store stays empty and a
    /// [`Notice::LoadFailed`] is queued. A session loads successfully at most
    /// once; a failed load may be retried.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        if self.load_state == LoadState::Loaded {
            return Err(StateTransitionError::InvalidTransition {
                from: "LOADED".into(),
                to: "LOADING".into(),
                reason: "data is loaded once per session".into(),
            }
            .into());
        }

        self.load_state = LoadState::Loading;
        let fetched = tokio::try_join!(
            self.gateway.fetch_tax_records(),
            self.gateway.fetch_countries()
        );

        match fetched {
            Ok((records, countries)) => {
                self.store.load(records, countries);
                self.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching data");
                self.load_state = LoadState::Failed;
                self.notices.push(Notice::LoadFailed);
                Err(SessionError::Load(e.to_string()))
            }
        }
    }

    /// Distinct country names offered by the filter.
    pub fn filter_options(&self) -> Vec<String> {
        available_country_names(self.store.countries())
    }

    /// Records passing the current filter, in store order.
    pub fn visible_records(&self) -> Vec<&TaxRecord> {
        visible_records(self.store.records(), self.filter.selection())
    }

    /// Open or close the filter dropdown.
    pub fn toggle_filter_dropdown(&mut self) {
        self.filter.toggle_dropdown();
    }

    /// Toggle one country in the filter; closes the dropdown.
    pub fn choose_filter_country(&mut self, name: &str) -> Result<(), SessionError> {
        let options = self.filter_options();
        self.filter.choose(name, &options)?;
        Ok(())
    }

    /// The table as it should be rendered now.
    pub fn table(&self) -> TableView {
        present(&self.visible_records(), &self.filter, &self.filter_options())
    }

    /// The edit modal, when one is open.
    pub fn modal(&self) -> Option<ModalView> {
        present_modal(&self.edit, self.store.countries())
    }

    /// Open the edit modal on a stored record.
    pub fn open_edit(&mut self, id: &RecordId) -> Result<(), SessionError> {
        let record = self
            .store
            .record(id)
            .ok_or_else(|| SessionError::UnknownRecord(id.clone()))?;
        self.edit.open(record)?;
        Ok(())
    }

    /// Change one field of the open draft.
    pub fn update_draft_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.edit.update_draft_field(field, value)?;
        Ok(())
    }

    /// Expand or collapse the modal's country picker.
    pub fn toggle_country_picker(&mut self) -> Result<(), SessionError> {
        self.edit.toggle_country_picker()?;
        Ok(())
    }

    /// Pick a country for the draft; collapses the picker.
    pub fn select_draft_country(&mut self, name: &str) -> Result<(), SessionError> {
        self.edit.select_country_in_draft(name)?;
        Ok(())
    }

    /// Edit action on a picker entry. Accepted and ignored.
    pub fn edit_country(&self, id: &CountryId) -> Result<(), SessionError> {
        let country = self
            .store
            .countries()
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| SessionError::UnknownCountry(id.clone()))?;
        self.edit.edit_country(country)?;
        Ok(())
    }

    /// Validate the draft, send the update, and merge the server's record.
    ///
    /// - Invalid draft: [`Notice::ValidationFailed`], no request, stays open.
    /// - Request failure: [`Notice::SaveFailed`], store untouched, draft kept.
    /// - Success: the returned record replaces the stored one by id and the
    ///   modal closes.
    pub async fn submit(&mut self) -> Result<MergeOutcome, SessionError> {
        let payload = match self.edit.begin_submit() {
            Ok(payload) => payload,
            Err(EditError::Validation(e)) => {
                self.notices.push(Notice::ValidationFailed);
                return Err(EditError::Validation(e).into());
            }
            Err(e) => return Err(e.into()),
        };

        match self.gateway.update_tax_record(&payload).await {
            Ok(saved) => Ok(self.edit.complete_save(saved, &mut self.store)?),
            Err(e) => {
                tracing::error!(error = %e, id = %payload.id, "error saving");
                self.edit.fail_save(Notice::SaveFailed.to_string())?;
                self.notices.push(Notice::SaveFailed);
                Err(SessionError::Save(e.to_string()))
            }
        }
    }

    /// Discard the draft and close the modal.
    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        self.edit.cancel()?;
        Ok(())
    }

    /// Pending notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
