//! # Text Rendering
//!
//! Turns the presenter's [`TableView`] and [`ModalView`] into plain text for
//! the terminal. Layout only; every value shown comes from the views.

use std::fmt::Write as _;

use taxdesk_state::table::{FilterAffordance, HeaderCell};
use taxdesk_state::{EditPhase, ModalView, TableView};

/// Separator between columns.
const GAP: &str = "  ";

/// Render the table with padded columns, followed by the filter dropdown
/// when it is open.
pub fn render_table(view: &TableView) -> String {
    let header: Vec<String> = view.header.iter().map(header_text).collect();
    let body: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", join_padded(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", join_padded(&rule, &widths));

    if body.is_empty() {
        let _ = writeln!(out, "(no records)");
    }
    for row in &body {
        let _ = writeln!(out, "{}", join_padded(row, &widths));
    }

    if let Some(filter) = view.header.iter().find_map(|h| h.filter.as_ref()) {
        if filter.open {
            out.push_str(&render_dropdown(filter));
        }
    }
    out
}

/// Render the edit modal.
pub fn render_modal(modal: &ModalView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", modal.title);

    let name = if modal.name.is_empty() {
        format!("<{}>", modal.name_placeholder)
    } else {
        modal.name.clone()
    };
    let _ = writeln!(out, "Name*:   {name}");

    let country = if modal.country_is_placeholder {
        format!("<{}>", modal.country_display)
    } else {
        modal.country_display.clone()
    };
    let arrow = if modal.picker_open { "^" } else { "v" };
    let _ = writeln!(out, "Country: {country} {arrow}");

    for (i, option) in modal.picker_options.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}  [edit]", i + 1, option.name);
    }

    if let Some(error) = &modal.error {
        let _ = writeln!(out, "error: {error}");
    }
    match modal.phase {
        EditPhase::Saving => {
            let _ = writeln!(out, "Saving...");
        }
        _ => {
            let _ = writeln!(out, "[cancel]  [save]");
        }
    }
    out
}

fn header_text(cell: &HeaderCell) -> String {
    match &cell.filter {
        Some(filter) if filter.active => format!("{} [filter*]", cell.label),
        Some(_) => format!("{} [filter]", cell.label),
        None => cell.label.to_string(),
    }
}

fn render_dropdown(filter: &FilterAffordance) -> String {
    let mut out = String::from("\nFilter by country:\n");
    if filter.options.is_empty() {
        out.push_str("  (no countries)\n");
    }
    for option in &filter.options {
        let mark = if option.checked { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}", option.name);
    }
    out
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join(GAP);
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxdesk_core::TaxRecord;
    use taxdesk_state::{present, present_modal, CountryFilter, EditWorkflow};

    fn record(id: &str, name: &str, country: &str) -> TaxRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "gender": "Male",
            "requestDate": "2024-01-05",
            "country": country
        }))
        .unwrap()
    }

    #[test]
    fn table_lists_header_and_rows() {
        let r = record("1", "Acme", "Peru");
        let text = render_table(&present(&[&r], &CountryFilter::new(), &[]));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Customers");
        assert!(lines[2].starts_with("Entity"));
        assert!(lines[2].contains("Country [filter]"));
        assert!(lines[4].contains("Acme"));
        assert!(lines[4].contains("Jan 5, 2024"));
        assert!(lines[4].ends_with("[edit 1]"));
    }

    #[test]
    fn empty_table_says_so() {
        let text = render_table(&present(&[], &CountryFilter::new(), &[]));
        assert!(text.contains("(no records)"));
    }

    #[test]
    fn open_dropdown_marks_selection() {
        let options = vec!["Peru".to_string(), "Chile".to_string()];
        let mut filter = CountryFilter::new();
        filter.toggle_dropdown();
        filter.choose("Peru", &options).unwrap();
        filter.toggle_dropdown();

        let text = render_table(&present(&[], &filter, &options));
        assert!(text.contains("Country [filter*]"));
        assert!(text.contains("[x] Peru"));
        assert!(text.contains("[ ] Chile"));
    }

    #[test]
    fn modal_shows_draft_and_actions() {
        let mut wf = EditWorkflow::new();
        wf.open(&record("1", "Acme", "Peru")).unwrap();
        let text = render_modal(&present_modal(&wf, &[]).unwrap());
        assert!(text.starts_with("== Edit Customer =="));
        assert!(text.contains("Name*:   Acme"));
        assert!(text.contains("Country: Peru v"));
        assert!(text.contains("[save]"));
    }
}
