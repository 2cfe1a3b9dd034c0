//! Plain-text rendering for CLI output

use std::collections::BTreeMap;

use console::{measure_text_width, pad_str, Alignment, Style};
use convdashlib::output::{ColumnLabels, Table};
use convdashlib::query::GRAND_TOTAL;
use convdashlib::Facet;

/// Widest a cell may grow before it is truncated
const MAX_CELL_WIDTH: usize = 40;

struct Theme {
    title: Style,
    header: Style,
    total: Style,
    notice: Style,
}

fn create_theme() -> Theme {
    Theme {
        title: Style::new().bold().underlined(),
        header: Style::new().bold(),
        total: Style::new().bold(),
        notice: Style::new().yellow(),
    }
}

/// Truncate a value to fit within max_len, adding ".." suffix if needed
fn truncate_cell(value: &str, max_len: usize) -> String {
    if measure_text_width(value) > max_len {
        let kept: String = value.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", kept)
    } else {
        value.to_string()
    }
}

/// Numbers and percentages align right, text aligns left
fn alignment(value: &str) -> Alignment {
    match value.chars().next() {
        Some(c) if c.is_ascii_digit() => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Render a table with a bold header, a separator, and a bold Grand Total row
pub fn render_table(table: &Table, labels: &ColumnLabels) -> String {
    let theme = create_theme();
    let headers = labels.headers(table);
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| truncate_cell(v, MAX_CELL_WIDTH)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| measure_text_width(&row[i]))
                .chain(std::iter::once(measure_text_width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    if let Some(title) = &table.title {
        out.push_str(&format!("{}\n\n", theme.title.apply_to(title)));
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad_str(h, *w, Alignment::Left, None).into_owned())
        .collect();
    out.push_str(&format!("{}\n", theme.header.apply_to(header_line.join("  "))));

    let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| pad_str(v, *w, alignment(v), None).into_owned())
            .collect();
        let line = line.join("  ");
        if row.first().map(String::as_str) == Some(GRAND_TOTAL) {
            out.push_str(&format!("{}\n", theme.total.apply_to(line)));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Render a user-facing notice line
pub fn render_notice(message: &str) -> String {
    format!("{}\n", create_theme().notice.apply_to(message))
}

/// Render facet options, one facet per block
pub fn render_facets(options: &BTreeMap<Facet, Vec<String>>) -> String {
    let theme = create_theme();
    let mut out = String::new();
    for (facet, values) in options {
        out.push_str(&format!(
            "{} ({})\n",
            theme.header.apply_to(facet.name()),
            values.len()
        ));
        for value in values {
            out.push_str(&format!("  {}\n", value));
        }
    }
    out
}
