use crate::error::DatevError;
use crate::extraction::{Document, Page};
use crate::layout::Layout;
use crate::model::PageSelection;

/// Find the pages holding the report described by `layout`.
///
/// An explicit selection is returned as given; it is checked against the
/// document only when the pages are resolved. Otherwise the page texts are
/// searched for the layout's title: single-page kinds take the first match,
/// multi-page kinds span from the first to the last match, including any
/// pages in between that lack the title.
pub fn locate(
    document: &Document,
    layout: &Layout,
    explicit: Option<PageSelection>,
) -> Result<PageSelection, DatevError> {
    if let Some(selection) = explicit {
        return Ok(selection);
    }

    let mut matches = document
        .pages
        .iter()
        .filter(|page| layout.matches_title(&page.text))
        .map(|page| page.number);

    let first = matches.next().ok_or_else(|| DatevError::PageNotFound {
        document: document.source.clone(),
        kind: layout.kind,
        searched: format!("title '{}'", layout.title_label),
    })?;

    if !layout.kind.spans_pages() {
        return Ok(PageSelection::Single(first));
    }

    let last = matches.last().unwrap_or(first);
    Ok(PageSelection::Range { start: first, end: last })
}

/// The pages a selection refers to, in order.
///
/// Fails with `PageNotFound` when the selection is empty or reaches past the
/// end of the document.
pub fn resolve_pages<'a>(
    document: &'a Document,
    layout: &Layout,
    selection: PageSelection,
) -> Result<Vec<&'a Page>, DatevError> {
    let not_found = |searched: String| DatevError::PageNotFound {
        document: document.source.clone(),
        kind: layout.kind,
        searched,
    };

    if selection.first() == 0 || selection.first() > selection.last() {
        return Err(not_found(format!("invalid selection {}", selection)));
    }

    selection
        .pages()
        .map(|number| {
            document.page(number).ok_or_else(|| {
                not_found(format!(
                    "{} requested, document has {} pages",
                    selection,
                    document.pages.len()
                ))
            })
        })
        .collect()
}
