use datev_core::model::{Column, ColumnType, ExtractionResult};
use std::fmt::Write;

use crate::commands::convert::BatchSummary;

/// Plain-text rendering of one extraction: a heading, the rows as an aligned
/// table and any warnings.
pub fn format_result(result: &ExtractionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} from {} ({}) ===\n",
        result.kind, result.document, result.selection
    );

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.to_string()).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|s| s.chars().count())
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = result.columns.iter().map(|c| c.name.as_str());
    let _ = writeln!(out, "{}", render_line(header, &result.columns, &widths));
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "  {}", "-".repeat(total));
    for row in &cells {
        let values = row.iter().map(String::as_str);
        let _ = writeln!(out, "{}", render_line(values, &result.columns, &widths));
    }

    let _ = writeln!(out, "\n  {} row(s)", result.rows.len());
    for warning in &result.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
    out
}

fn render_line<'a>(
    values: impl Iterator<Item = &'a str>,
    columns: &[Column],
    widths: &[usize],
) -> String {
    let parts: Vec<String> = values
        .zip(columns)
        .zip(widths)
        .map(|((value, column), &width)| match column.column_type {
            ColumnType::Amount => format!("{value:>width$}"),
            ColumnType::Text => format!("{value:<width$}"),
        })
        .collect();
    format!("  {}", parts.join("  ").trim_end())
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{} converted, {} already present, {} failed",
        summary.converted.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for (pdf, reason) in &summary.failed {
        let _ = writeln!(out, "  {}: {}", pdf.display(), reason);
    }
    out
}
