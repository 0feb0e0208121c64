//! # Record Store
//!
//! In-memory, authoritative copy of the fetched tax records and countries.
//! Everything rendered is derived from here.
//!
//! The store is populated once by [`RecordStore::load`] and afterwards only
//! changes through [`RecordStore::apply_update`], which replaces a record
//! wholesale by id. Every mutation bumps [`RecordStore::revision`], so
//! dependents can tell when their derived views are stale.

use taxdesk_core::{Country, RecordId, TaxRecord};

/// Result of merging a server-returned record into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The record with the same id was replaced.
    Replaced,
    /// No stored record has that id. The store is untouched.
    NoMatch,
}

/// Fetched records and countries.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TaxRecord>,
    countries: Vec<Country>,
    revision: u64,
}

impl RecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire contents with a fresh fetch.
    pub fn load(&mut self, records: Vec<TaxRecord>, countries: Vec<Country>) {
        tracing::debug!(
            records = records.len(),
            countries = countries.len(),
            "record store loaded"
        );
        self.records = records;
        self.countries = countries;
        self.revision += 1;
    }

    /// Replace the record whose id matches `updated.id`.
    ///
    /// An unknown id leaves the store unchanged and reports
    /// [`MergeOutcome::NoMatch`]; the caller decides whether that matters.
    pub fn apply_update(&mut self, updated: TaxRecord) -> MergeOutcome {
        match self.records.iter_mut().find(|r| r.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.revision += 1;
                MergeOutcome::Replaced
            }
            None => {
                tracing::warn!(
                    id = %updated.id,
                    "saved record does not match any stored record; merge skipped"
                );
                MergeOutcome::NoMatch
            }
        }
    }

    /// All records, in fetch order.
    pub fn records(&self) -> &[TaxRecord] {
        &self.records
    }

    /// All countries, in fetch order.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Look up one record.
    pub fn record(&self, id: &RecordId) -> Option<&TaxRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Whether no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mutation counter; starts at 0 and increases on every change.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, name: &str, country: &str) -> TaxRecord {
        serde_json::from_value(json!({ "id": id, "name": name, "country": country })).unwrap()
    }

    fn country(id: &str, name: &str) -> Country {
        serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
    }

    #[test]
    fn new_store_is_empty_at_revision_zero() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert!(store.countries().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn load_replaces_contents() {
        let mut store = RecordStore::new();
        store.load(vec![record("1", "A", "Peru")], vec![country("1", "Peru")]);
        store.load(
            vec![record("2", "B", "Chile"), record("3", "C", "Peru")],
            vec![],
        );
        assert_eq!(store.records().len(), 2);
        assert!(store.countries().is_empty());
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn apply_update_replaces_by_id_in_place() {
        let mut store = RecordStore::new();
        store.load(
            vec![record("1", "A", "Peru"), record("2", "B", "Chile")],
            vec![],
        );

        let outcome = store.apply_update(record("2", "Bee", "Peru"));

        assert_eq!(outcome, MergeOutcome::Replaced);
        assert_eq!(store.records()[1].name, "Bee");
        assert_eq!(store.records()[0].name, "A");
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn apply_update_with_unknown_id_is_a_no_op() {
        let mut store = RecordStore::new();
        store.load(vec![record("1", "A", "Peru")], vec![]);
        let before = store.records().to_vec();

        let outcome = store.apply_update(record("9", "Ghost", "Peru"));

        assert_eq!(outcome, MergeOutcome::NoMatch);
        assert_eq!(store.records(), before.as_slice());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn record_lookup_by_id() {
        let mut store = RecordStore::new();
        store.load(vec![record("1", "A", "Peru")], vec![]);
        let id = RecordId::new("1").unwrap();
        assert_eq!(store.record(&id).map(|r| r.name.as_str()), Some("A"));
        assert!(store.record(&RecordId::new("2").unwrap()).is_none());
    }
}
