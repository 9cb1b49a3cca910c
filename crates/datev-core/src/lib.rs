pub mod error;
pub mod export;
pub mod extraction;
pub mod layout;
pub mod locate;
pub mod model;
pub mod parsing;
pub mod structure;

use error::DatevError;
use extraction::{Document, PdfExtractor};
use layout::Layout;
use model::{Column, ColumnType, ExtractionResult, ExtractionWarning, PageSelection};
use structure::StructureTemplate;

/// Caller-supplied knobs for one extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions<'a> {
    /// Pages to read instead of searching for the report title.
    pub selection: Option<PageSelection>,
    /// Expected row structure; a count mismatch becomes a warning.
    pub template: Option<&'a StructureTemplate>,
}

/// Main API entry point: extract one report from PDF bytes.
///
/// `source` identifies the document in errors and in the result.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    source: &str,
    extractor: &dyn PdfExtractor,
    layout: &Layout,
    options: &ExtractOptions<'_>,
) -> Result<ExtractionResult, DatevError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted {}",
        source
    );
    let document = Document::new(source, pages);
    extract_document(&document, layout, options)
}

/// Extract one report from an already opened document.
///
/// Locating the pages is the only step that can fail; an empty table or a
/// row count that disagrees with the template is reported as a warning on the
/// returned result. Holds no state between calls.
pub fn extract_document(
    document: &Document,
    layout: &Layout,
    options: &ExtractOptions<'_>,
) -> Result<ExtractionResult, DatevError> {
    let _span = tracing::debug_span!("extract", document = %document.source, kind = %layout.kind)
        .entered();

    let selection = locate::locate(document, layout, options.selection)?;
    let pages = locate::resolve_pages(document, layout, selection)?;
    tracing::debug!(%selection, "located report pages");

    let built = parsing::build_rows(&pages, layout);
    tracing::debug!(
        rows = built.rows.len(),
        skipped = built.skipped_lines,
        "built rows"
    );

    let mut warnings = built.warnings;
    if built.rows.is_empty() {
        warnings.push(ExtractionWarning::EmptyExtraction { selection });
    }

    if let Some(mismatch) = structure::validate(&built.rows, options.template) {
        warnings.push(mismatch);
    }

    let page_text = pages.first().map(|p| p.text.as_str()).unwrap_or("");
    let columns = output_columns(layout, page_text);

    Ok(ExtractionResult {
        document: document.source.clone(),
        kind: layout.kind,
        selection,
        columns,
        rows: built.rows,
        warnings,
    })
}

/// Column schema of the result; amount columns take the period labels printed
/// on the page when the layout asks for it and all of them can be found.
fn output_columns(layout: &Layout, page_text: &str) -> Vec<Column> {
    let mut columns = layout.output_columns();
    if !layout.period_header {
        return columns;
    }

    match parsing::header::detect_period_labels(page_text, layout.amount_column_count()) {
        Some(labels) => {
            let amount_columns = columns
                .iter_mut()
                .filter(|c| c.column_type == ColumnType::Amount);
            for (column, label) in amount_columns.zip(labels) {
                column.name = label;
            }
        }
        None => tracing::debug!("no period header found, keeping default column names"),
    }

    columns
}
