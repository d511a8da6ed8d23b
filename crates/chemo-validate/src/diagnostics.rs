//! Diagnostic samples of failing rows and their text rendering.

use chemo_model::columns::{DIAGNOSTIC_COLUMNS, MIXTURE};
use chemo_model::{FailingRowSet, OutcomeReport, SampleRow, Table};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement};

/// Rows kept in a diagnostic sample unless configured otherwise.
pub const DEFAULT_SAMPLE_LIMIT: usize = 20;

/// Diagnostic columns for `table`, with `Mixture` once it has been derived.
pub fn diagnostic_columns(table: &Table) -> Vec<&'static str> {
    let mut columns = DIAGNOSTIC_COLUMNS.to_vec();
    if table.has_column(MIXTURE) {
        columns.push(MIXTURE);
    }
    columns
}

/// The first `limit` failing rows of `table`, restricted to the diagnostic columns.
pub fn sample_rows(table: &Table, failing: &FailingRowSet, limit: usize) -> Vec<SampleRow> {
    let columns = diagnostic_columns(table);
    table
        .rows()
        .iter()
        .filter(|row| failing.contains(row.id()))
        .take(limit)
        .map(|row| SampleRow {
            row_id: row.id(),
            values: columns
                .iter()
                .map(|column| ((*column).to_string(), row.get(column).clone()))
                .collect(),
        })
        .collect()
}

/// Renders a sample as a text table, one line per row.
pub fn render_sample(sample: &[SampleRow]) -> String {
    let Some(first) = sample.first() else {
        return String::new();
    };
    let mut table = comfy_table::Table::new();
    let mut header = vec![Cell::new("_row_id")];
    header.extend(first.values.iter().map(|(column, _)| Cell::new(column)));
    table.set_header(header);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Disabled);
    for row in sample {
        let mut cells = vec![Cell::new(row.row_id)];
        cells.extend(
            row.values
                .iter()
                .map(|(_, value)| Cell::new(value.as_text().unwrap_or("-"))),
        );
        table.add_row(cells);
    }
    table.to_string()
}

/// Renders one line per rule with its status and failing row count.
pub fn render_report(report: &OutcomeReport) -> String {
    let mut table = comfy_table::Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Parameters"),
        header_cell("Status"),
        header_cell("Failing rows"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for outcome in &report.outcomes {
        table.add_row(vec![
            Cell::new(&outcome.rule),
            Cell::new(&outcome.parameters),
            status_cell(outcome.passed),
            Cell::new(outcome.failing_count()),
        ]);
    }
    table.to_string()
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(passed: bool) -> Cell {
    if passed {
        Cell::new("PASS").fg(Color::Green)
    } else {
        Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}
