//! Console tables for mapping, import, and results output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use propsift_engine::ScoredProperty;
use propsift_import::ImportSummary;
use propsift_ingest::ParsedCsv;
use propsift_map::{MappingState, REQUIRED_FIELDS};
use propsift_transform::is_array_field;

use crate::fields::DESTINATION_FIELDS;

pub fn print_mapping(state: &MappingState) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for column in &state.columns {
        match state.mappings.get(column) {
            Some(field) => {
                let required = REQUIRED_FIELDS.contains(&field.as_str());
                table.add_row(vec![
                    Cell::new(column),
                    Cell::new(field).fg(Color::Green),
                    if required {
                        Cell::new("✓").fg(Color::Cyan)
                    } else {
                        dim_cell("-")
                    },
                ]);
            }
            None => {
                table.add_row(vec![
                    Cell::new(column).fg(Color::DarkGrey),
                    dim_cell("(unmapped)"),
                    dim_cell("-"),
                ]);
            }
        }
    }
    println!("{table}");
    println!("Mapping progress: {}%", state.progress());
    let missing = state.missing_required();
    if !missing.is_empty() {
        println!("Missing required fields: {}", missing.join(", "));
    }
}

pub fn print_preview(parsed: &ParsedCsv) {
    let rows = parsed.sample.values().map(Vec::len).max().unwrap_or(0);
    if rows == 0 {
        println!("No data rows.");
        return;
    }
    let mut table = Table::new();
    table.set_header(
        parsed
            .headers
            .iter()
            .map(|h| header_cell(h))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for index in 0..rows {
        table.add_row(
            parsed
                .headers
                .iter()
                .map(|header| {
                    let value = parsed
                        .sample
                        .get(header)
                        .and_then(|column| column.get(index))
                        .map(String::as_str)
                        .unwrap_or("");
                    Cell::new(value)
                })
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
    println!("Showing {rows} of {} rows.", parsed.total_rows);
}

pub fn print_import_summary(summary: &ImportSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Batch"),
        header_cell("Rows"),
        header_cell("Inserted"),
        header_cell("Tag links"),
        header_cell("List links"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(&summary.batch_id),
        Cell::new(summary.total_rows),
        Cell::new(summary.inserted).fg(Color::Green),
        Cell::new(summary.tag_links),
        Cell::new(summary.list_links),
        count_cell(summary.issues.len(), Color::Yellow),
    ]);
    println!("{table}");
    for issue in &summary.issues {
        match issue.row {
            Some(row) => eprintln!("issue (row {row}): {}", issue.message),
            None => eprintln!("issue: {}", issue.message),
        }
    }
}

pub fn print_results(rows: &[ScoredProperty]) {
    if rows.is_empty() {
        println!("No matching properties.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Address"),
        header_cell("City"),
        header_cell("State"),
        header_cell("Zip"),
        header_cell("Owner"),
        header_cell("Status"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 6, CellAlignment::Right);
    for row in rows {
        let owner = [
            row.property.text("first_name").unwrap_or(""),
            row.property.text("last_name").unwrap_or(""),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
        table.add_row(vec![
            text_cell(&row.property, "property_address"),
            text_cell(&row.property, "property_city"),
            text_cell(&row.property, "property_state"),
            text_cell(&row.property, "property_zip"),
            Cell::new(owner),
            text_cell(&row.property, "status"),
            score_cell(row.score),
        ]);
    }
    println!("{table}");
    println!("{} properties.", rows.len());
}

pub fn print_fields() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Array"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in DESTINATION_FIELDS {
        table.add_row(vec![
            Cell::new(field),
            if REQUIRED_FIELDS.contains(field) {
                Cell::new("✓").fg(Color::Cyan)
            } else {
                dim_cell("-")
            },
            if is_array_field(field) {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
}

fn text_cell(record: &propsift_model::Record, field: &str) -> Cell {
    match record.text(field) {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn score_cell(score: i64) -> Cell {
    if score < 0 {
        Cell::new(score).fg(Color::Red)
    } else {
        Cell::new(score).add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
