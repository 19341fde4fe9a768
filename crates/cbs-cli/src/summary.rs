//! Result tables printed after validate/upload runs.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use cbs_upload::SessionResults;
use cbs_validate::ValidationOutcome;

const MAX_DETAIL_ROWS: usize = 20;

pub fn print_validation_summary(outcome: &ValidationOutcome) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec![header_cell("Check"), header_cell("Count")]);

    table.add_row(vec![Cell::new("Total records"), count_cell(outcome.total_records, None)]);
    table.add_row(vec![
        Cell::new("Valid"),
        count_cell(outcome.valid_records.len(), Some(Color::Green)),
    ]);
    table.add_row(vec![
        Cell::new("Invalid"),
        count_cell(outcome.invalid_records.len(), Some(Color::Red)),
    ]);
    table.add_row(vec![
        Cell::new("Warnings"),
        count_cell(outcome.warning_count(), Some(Color::Yellow)),
    ]);
    table.add_row(vec![
        Cell::new("Diagnosis suggestions"),
        count_cell(outcome.suggestions.len(), Some(Color::Yellow)),
    ]);
    table.add_row(vec![
        Cell::new("Cleaned values"),
        count_cell(outcome.transformations.len(), None),
    ]);
    println!("{table}");

    if !outcome.invalid_records.is_empty() {
        println!("Invalid records:");
        let mut detail = Table::new();
        detail.load_preset(UTF8_FULL);
        detail.set_header(vec![header_cell("Row"), header_cell("Errors")]);
        for invalid in outcome.invalid_records.iter().take(MAX_DETAIL_ROWS) {
            detail.add_row(vec![
                Cell::new(invalid.row_number).set_alignment(CellAlignment::Right),
                Cell::new(invalid.errors.join("\n")),
            ]);
        }
        println!("{detail}");
        if outcome.invalid_records.len() > MAX_DETAIL_ROWS {
            println!(
                "... and {} more invalid records",
                outcome.invalid_records.len() - MAX_DETAIL_ROWS
            );
        }
    }

    if !outcome.suggestions.is_empty() {
        println!("Diagnosis suggestions (auto-accepted):");
        let mut detail = Table::new();
        detail.load_preset(UTF8_FULL);
        detail.set_header(vec![
            header_cell("Row"),
            header_cell("Original"),
            header_cell("Accepted"),
            header_cell("Confidence"),
        ]);
        for suggestion in outcome.suggestions.iter().take(MAX_DETAIL_ROWS) {
            detail.add_row(vec![
                Cell::new(suggestion.row_number).set_alignment(CellAlignment::Right),
                Cell::new(&suggestion.original_code),
                Cell::new(format!(
                    "{} ({})",
                    suggestion.suggested_code, suggestion.suggested_name
                )),
                Cell::new(format!("{:.0}%", suggestion.confidence * 100.0))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{detail}");
    }

    for warning in &outcome.dataset_warnings {
        println!("warning: {warning}");
    }
}

pub fn print_upload_summary(results: &SessionResults) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec![header_cell("Upload"), header_cell("Count")]);
    table.add_row(vec![Cell::new("Submitted"), count_cell(results.total, None)]);
    table.add_row(vec![
        Cell::new("Succeeded"),
        count_cell(results.success_count(), Some(Color::Green)),
    ]);
    table.add_row(vec![
        Cell::new("Failed"),
        count_cell(results.failed_count(), Some(Color::Red)),
    ]);
    table.add_row(vec![
        Cell::new("Never attempted"),
        count_cell(results.pending_count(), None),
    ]);
    println!("{table}");
    println!("State: {:?} ({:.0}%)", results.state, results.percentage());

    if !results.failed_records.is_empty() {
        println!("Failed records:");
        let mut detail = Table::new();
        detail.load_preset(UTF8_FULL);
        detail.set_header(vec![header_cell("Row"), header_cell("Error")]);
        for failed in results.failed_records.iter().take(MAX_DETAIL_ROWS) {
            detail.add_row(vec![
                Cell::new(failed.row_number).set_alignment(CellAlignment::Right),
                Cell::new(&failed.error),
            ]);
        }
        println!("{detail}");
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Option<Color>) -> Cell {
    let cell = Cell::new(count).set_alignment(CellAlignment::Right);
    match color {
        Some(color) if count > 0 => cell.fg(color),
        _ => cell,
    }
}
