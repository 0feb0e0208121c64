//! # Table Presenter
//!
//! Pure projection of (visible records, fixed column schema, filter state)
//! into a renderable grid, and of the edit workflow into a modal view.
//! Nothing here holds state; call it again after every change.

use std::fmt;

use serde::Serialize;
use taxdesk_core::{format_request_date, gender_tag_style, Country, CountryId, RecordId, TaxRecord};

use crate::edit::{EditPhase, EditWorkflow};
use crate::filter::CountryFilter;

/// Page heading.
pub const PAGE_TITLE: &str = "Customers";

/// Modal heading.
pub const MODAL_TITLE: &str = "Edit Customer";

/// Placeholder shown in an empty name field.
pub const NAME_PLACEHOLDER: &str = "Enter name";

/// Placeholder shown when the draft has no country.
pub const COUNTRY_PLACEHOLDER: &str = "Select country";

/// The fixed columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Record name, plain text.
    Entity,
    /// Gender as a styled tag.
    Gender,
    /// Formatted request date.
    RequestDate,
    /// Country, plain text; the header hosts the filter.
    Country,
    /// Edit trigger; no header label.
    Actions,
}

impl Column {
    /// Every column, in display order.
    pub const ALL: [Column; 5] = [
        Column::Entity,
        Column::Gender,
        Column::RequestDate,
        Column::Country,
        Column::Actions,
    ];

    /// Header text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Gender => "Gender",
            Self::RequestDate => "Request date",
            Self::Country => "Country",
            Self::Actions => "",
        }
    }
}

/// One entry in the filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Country name.
    pub name: String,
    /// Whether it is currently selected.
    pub checked: bool,
}

/// The filter control in the Country header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterAffordance {
    /// Highlighted when any country is selected.
    pub active: bool,
    /// Whether the dropdown is expanded.
    pub open: bool,
    /// Options, only populated while open.
    pub options: Vec<FilterOption>,
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    /// Which column.
    pub column: Column,
    /// Header text.
    pub label: &'static str,
    /// Present on the Country column only.
    pub filter: Option<FilterAffordance>,
}

/// One body cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// Styled tag; `style` is the lowercase style key.
    Tag {
        /// Shown text.
        label: String,
        /// Style key, empty when the value is absent.
        style: String,
    },
    /// Control that opens the edit workflow on a record.
    EditAction {
        /// Target record.
        record_id: RecordId,
    },
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Tag { label, .. } => f.write_str(label),
            Cell::EditAction { record_id } => write!(f, "[edit {record_id}]"),
        }
    }
}

/// One body row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// The record this row shows.
    pub record_id: RecordId,
    /// One cell per [`Column::ALL`] entry.
    pub cells: Vec<Cell>,
}

/// A fully derived table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Page heading.
    pub title: &'static str,
    /// Header row.
    pub header: Vec<HeaderCell>,
    /// Body rows, one per visible record.
    pub rows: Vec<TableRow>,
}

/// Project visible records into a table.
///
/// `options` are the distinct country names offered by the filter.
pub fn present(records: &[&TaxRecord], filter: &CountryFilter, options: &[String]) -> TableView {
    let header = Column::ALL
        .iter()
        .map(|&column| HeaderCell {
            column,
            label: column.label(),
            filter: (column == Column::Country).then(|| filter_affordance(filter, options)),
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| TableRow {
            record_id: record.id.clone(),
            cells: Column::ALL.iter().map(|&c| cell(record, c)).collect(),
        })
        .collect();

    TableView {
        title: PAGE_TITLE,
        header,
        rows,
    }
}

fn filter_affordance(filter: &CountryFilter, options: &[String]) -> FilterAffordance {
    let options = if filter.is_open() {
        options
            .iter()
            .map(|name| FilterOption {
                name: name.clone(),
                checked: filter.selection().contains(name),
            })
            .collect()
    } else {
        Vec::new()
    };
    FilterAffordance {
        active: filter.is_active(),
        open: filter.is_open(),
        options,
    }
}

fn cell(record: &TaxRecord, column: Column) -> Cell {
    match column {
        Column::Entity => Cell::Text(record.name.clone()),
        Column::Gender => Cell::Tag {
            label: record.gender().unwrap_or_default().to_string(),
            style: gender_tag_style(record.gender()),
        },
        Column::RequestDate => Cell::Text(format_request_date(record.request_date())),
        Column::Country => Cell::Text(record.country.clone()),
        Column::Actions => Cell::EditAction {
            record_id: record.id.clone(),
        },
    }
}

/// One entry in the modal's country picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerOption {
    /// Country id; the picker lists every country, duplicates included.
    pub id: CountryId,
    /// Country name.
    pub name: String,
}

/// The edit modal, derived from the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    /// Modal heading.
    pub title: &'static str,
    /// Current phase (OPEN or SAVING).
    pub phase: EditPhase,
    /// Draft name.
    pub name: String,
    /// Placeholder for an empty name.
    pub name_placeholder: &'static str,
    /// Draft country, or the placeholder when empty.
    pub country_display: String,
    /// Whether `country_display` is the placeholder.
    pub country_is_placeholder: bool,
    /// Whether the picker is expanded.
    pub picker_open: bool,
    /// Picker entries, only populated while expanded.
    pub picker_options: Vec<PickerOption>,
    /// Last validation or save error.
    pub error: Option<String>,
}

/// Project the edit workflow into a modal, or `None` when closed.
pub fn present_modal(workflow: &EditWorkflow, countries: &[Country]) -> Option<ModalView> {
    let draft = workflow.draft()?;
    let picker_open = workflow.is_country_picker_open();
    let picker_options = if picker_open {
        countries
            .iter()
            .map(|c| PickerOption {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };
    let country_is_placeholder = draft.country.is_empty();

    Some(ModalView {
        title: MODAL_TITLE,
        phase: workflow.phase(),
        name: draft.name.clone(),
        name_placeholder: NAME_PLACEHOLDER,
        country_display: if country_is_placeholder {
            COUNTRY_PLACEHOLDER.to_string()
        } else {
            draft.country.clone()
        },
        country_is_placeholder,
        picker_open,
        picker_options,
        error: workflow.last_error().map(str::to_string),
    })
}
