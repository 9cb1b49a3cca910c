pub mod amount;
pub mod columns;
pub mod header;
pub mod noise;

use crate::extraction::lines::group_lines;
use crate::extraction::Page;
use crate::layout::Layout;
use crate::model::{CellValue, ColumnType, ExtractedRow, ExtractionWarning};
use amount::parse_amount;
use columns::{split_line, RawLine};

/// Rows built from a run of pages, plus what was noticed on the way.
#[derive(Debug, Clone, Default)]
pub struct BuiltRows {
    pub rows: Vec<ExtractedRow>,
    pub warnings: Vec<ExtractionWarning>,
    /// Lines dropped as header, footer or otherwise non-tabular.
    pub skipped_lines: usize,
}

/// Turn the words of `pages` into typed rows using `layout`.
///
/// Pages are processed in the order given and lines top to bottom, so rows of
/// page N always precede rows of page N+1. A page boundary never merges or
/// splits a row.
pub fn build_rows(pages: &[&Page], layout: &Layout) -> BuiltRows {
    let mut built = BuiltRows::default();

    for page in pages {
        let before = built.rows.len();

        for line in group_lines(&page.words, layout.line_tolerance) {
            let raw = split_line(&line, &layout.columns, layout.anchor);

            if raw.is_blank() {
                built.skipped_lines += 1;
                continue;
            }

            if let Some(rule) = layout
                .noise
                .iter()
                .find(|rule| rule.is_noise(&raw, &layout.columns))
            {
                tracing::debug!(
                    page = page.number,
                    line = %raw.text,
                    rule = %rule.describe(&layout.columns),
                    "skipping line"
                );
                built.skipped_lines += 1;
                continue;
            }

            match typed_row(page.number, &raw, layout, &mut built.warnings) {
                Some(row) => built.rows.push(row),
                None => built.skipped_lines += 1,
            }
        }

        tracing::debug!(
            page = page.number,
            rows = built.rows.len() - before,
            "built rows for page"
        );
    }

    built
}

/// Parse the raw cells of a line. Returns `None` when nothing survives; the
/// line's warnings are only kept for rows that are emitted.
fn typed_row(
    page: usize,
    raw: &RawLine,
    layout: &Layout,
    warnings: &mut Vec<ExtractionWarning>,
) -> Option<ExtractedRow> {
    let mut row_warnings = Vec::new();
    let cells: Vec<CellValue> = layout
        .columns
        .iter()
        .zip(&raw.cells)
        .map(|(column, text)| match column.column_type {
            ColumnType::Text => CellValue::Text(text.trim().to_string()),
            ColumnType::Amount => match parse_amount(text, column.sign) {
                Ok(Some(value)) => CellValue::Amount(value),
                Ok(None) => CellValue::Empty,
                Err(_) => {
                    row_warnings.push(ExtractionWarning::MalformedCell {
                        page,
                        column: column.name.clone(),
                        text: text.trim().to_string(),
                    });
                    CellValue::Empty
                }
            },
        })
        .collect();

    if cells.iter().all(CellValue::is_blank) {
        return None;
    }

    warnings.append(&mut row_warnings);
    Some(ExtractedRow { page, cells })
}
