//! # Country Filter
//!
//! Derives the filter options from the country list and the visible subset
//! of records from the current selection.
//!
//! The free functions are pure and may be called any number of times.
//! [`CountryFilter`] adds the dropdown state of the filter affordance: one
//! choice per opening, after which the dropdown closes.
//!
//! Filtering is inclusive-OR. A record is visible when its country matches
//! any selected name; an empty selection shows every record.

use std::collections::{BTreeSet, HashSet};

use taxdesk_core::{Country, TaxRecord};

/// Errors from interacting with the filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A choice was made while the dropdown was closed.
    #[error("the country filter is closed; open it before choosing a country")]
    DropdownClosed,
    /// The name is neither a current option nor already selected.
    #[error("unknown country: {0}")]
    UnknownCountry(String),
}

/// A set of selected country names, iterated in sorted order.
///
/// Values are never mutated in place; [`CountrySelection::toggled`] returns
/// a new selection, so a changed selection is always a different value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountrySelection(BTreeSet<String>);

impl CountrySelection {
    /// The empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Selected names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// A copy with `name` added if absent, removed if present.
    pub fn toggled(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        if !names.remove(name) {
            names.insert(name.to_string());
        }
        Self(names)
    }
}

impl<S: Into<String>> FromIterator<S> for CountrySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Distinct country names, in order of first occurrence.
pub fn available_country_names(countries: &[Country]) -> Vec<String> {
    let mut seen = HashSet::new();
    countries
        .iter()
        .filter(|c| seen.insert(c.name.as_str()))
        .map(|c| c.name.clone())
        .collect()
}

/// Toggle `name` in `selected`, leaving `selected` untouched.
pub fn toggle_country(selected: &CountrySelection, name: &str) -> CountrySelection {
    selected.toggled(name)
}

/// Records whose country is selected, in their original order. An empty
/// selection yields every record.
pub fn visible_records<'a>(
    records: &'a [TaxRecord],
    selected: &CountrySelection,
) -> Vec<&'a TaxRecord> {
    if selected.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| selected.contains(&r.country))
        .collect()
}

/// Selection plus dropdown state of the country filter affordance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    selection: CountrySelection,
    dropdown_open: bool,
}

impl CountryFilter {
    /// Nothing selected, dropdown closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection.
    pub fn selection(&self) -> &CountrySelection {
        &self.selection
    }

    /// Whether the dropdown is showing its options.
    pub fn is_open(&self) -> bool {
        self.dropdown_open
    }

    /// Whether any country is selected.
    pub fn is_active(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Open the dropdown if closed, close it if open.
    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Toggle `name` and close the dropdown.
    ///
    /// `name` must be one of `options` (the current distinct country names),
    /// or already selected so that a stale entry can still be cleared.
    pub fn choose(&mut self, name: &str, options: &[String]) -> Result<(), FilterError> {
        if !self.dropdown_open {
            return Err(FilterError::DropdownClosed);
        }
        if !self.selection.contains(name) && !options.iter().any(|o| o == name) {
            return Err(FilterError::UnknownCountry(name.to_string()));
        }
        self.selection = toggle_country(&self.selection, name);
        self.dropdown_open = false;
        tracing::debug!(country = name, selected = self.selection.len(), "country filter toggled");
        Ok(())
    }
}
