//! Integration tests for the extract_pdf()/extract_document() pipeline.
//!
//! Uses a MockExtractor that returns pre-built pages with word positions
//! without invoking pdftotext, so these tests run without poppler-utils.

use datev_core::error::DatevError;
use datev_core::extraction::{BBox, Document, Page, PdfExtractor, Word};
use datev_core::layout::builtin::load_builtin;
use datev_core::model::{CellValue, ExtractionWarning, PageSelection, ReportKind};
use datev_core::structure::load_template;
use datev_core::{extract_document, extract_pdf, ExtractOptions};
use rust_decimal_macros::dec;
use std::io::Write;

struct MockExtractor {
    pages: Vec<Page>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<Page>, DatevError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn word(text: &str, x: f32, y: f32, width: f32) -> Word {
    Word {
        text: text.into(),
        bbox: BBox {
            x_min: x,
            y_min: y,
            x_max: x + width,
            y_max: y + 8.0,
        },
    }
}

fn page(number: usize, text: &str, words: Vec<Word>) -> Page {
    Page {
        number,
        text: text.into(),
        words,
    }
}

// Entwicklungsuebersicht: label column [0,170), 13 amount columns of 51pt
// from x=170, matched by the right edge of each word.
fn ewu_line(y: f32, label: &str, amounts: &[&str]) -> Vec<Word> {
    let mut words = vec![word(label, 20.0, y, 110.0)];
    for (i, amount) in amounts.iter().enumerate() {
        let start = 170.0 + 51.0 * i as f32;
        words.push(word(amount, start + 5.0, y, 40.0));
    }
    words
}

// SuSa: Konto [0,90), Beschriftung [90,320), EB-Wert [320,410),
// Periode Soll [410,500), ..., Saldo [750,900), matched by the left edge.
fn susa_line(y: f32, konto: &str, label: &str, eb: &str, soll: &str, saldo: &str) -> Vec<Word> {
    let mut words = vec![word(konto, 20.0, y, 30.0), word(label, 100.0, y, 80.0)];
    for (text, x) in [(eb, 330.0), (soll, 420.0), (saldo, 760.0)] {
        if !text.is_empty() {
            words.push(word(text, x, y, 60.0));
        }
    }
    words
}

fn susa_title(y: f32) -> Vec<Word> {
    vec![
        word("Summen", 20.0, y, 30.0),
        word("und", 55.0, y, 15.0),
        word("Salden", 95.0, y, 30.0),
    ]
}

const MONTH_HEADER: &str = "Bezeichnung Jan/2025 Feb/2025 Mär/2025 Apr/2025 Mai/2025 Jun/2025 \
    Jul/2025 Aug/2025 Sep/2025 Okt/2025 Nov/2025 Dez/2025 Jan/2026";

// ---------------------------------------------------------------------------
// Scenario 1: single-page Entwicklungsuebersicht with 12 tabular lines
// ---------------------------------------------------------------------------
#[test]
fn entwicklungsuebersicht_twelve_rows_without_template() {
    let labels = [
        "Umsatzerlöse",
        "Bestandsveränderungen",
        "Gesamtleistung",
        "Material-/Wareneinkauf",
        "Rohertrag",
        "Personalkosten",
        "Raumkosten",
        "Versicherungen/Beiträge",
        "Abschreibungen",
        "Sonstige Kosten",
        "Gesamtkosten",
        "Betriebsergebnis",
    ];
    let amounts = [
        "1.234,56", "2.000,00", "-15,00", "0,00", "10,10", "11,11", "12,12", "13,13", "14,14",
        "15,15", "16,16", "17,17", "99.999,99",
    ];

    let mut words = vec![word("Entwicklungsuebersicht", 20.0, 20.0, 120.0)];
    words.push(word("Bezeichnung", 20.0, 40.0, 60.0));
    for (i, label) in labels.iter().enumerate() {
        words.extend(ewu_line(60.0 + 12.0 * i as f32, label, &amounts));
    }
    words.push(word("Seite", 20.0, 560.0, 25.0));
    words.push(word("1", 50.0, 560.0, 5.0));

    let text = format!("Entwicklungsuebersicht 2025\n{MONTH_HEADER}\n...");
    let extractor = MockExtractor {
        pages: vec![
            page(1, "BWA Deckblatt", vec![word("BWA", 20.0, 20.0, 20.0)]),
            page(2, &text, words),
        ],
    };
    let layout = load_builtin(ReportKind::Entwicklungsuebersicht).unwrap();

    let result = extract_pdf(&[], "BWA 2025.12.pdf", &extractor, &layout, &ExtractOptions::default())
        .unwrap();

    assert_eq!(result.selection, PageSelection::Single(2));
    assert_eq!(result.rows.len(), 12);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    assert_eq!(result.columns.len(), 14);
    assert_eq!(result.columns[0].name, "Bezeichnung");
    assert_eq!(result.columns[1].name, "Jan/2025");
    assert_eq!(result.columns[13].name, "Jan/2026");

    let first = &result.rows[0];
    assert_eq!(first.cells[0], CellValue::Text("Umsatzerlöse".into()));
    assert_eq!(first.cells[1], CellValue::Amount(dec!(1234.56)));
    assert_eq!(first.cells[3], CellValue::Amount(dec!(-15.00)));
    assert_eq!(first.cells[13], CellValue::Amount(dec!(99999.99)));
    assert_eq!(
        result.rows[11].cells[0],
        CellValue::Text("Betriebsergebnis".into())
    );
}

#[test]
fn entwicklungsuebersicht_keeps_section_heading() {
    let mut words = vec![word("Entwicklungsübersicht", 20.0, 20.0, 120.0)];
    words.extend(ewu_line(60.0, "Rohertrag", &["1,00"; 13]));
    words.push(word("Kostenarten:", 20.0, 72.0, 60.0));
    words.extend(ewu_line(84.0, "Personalkosten", &["2,00"; 13]));
    words.push(word("Musterfirma GmbH", 20.0, 100.0, 90.0));

    let document = Document::new(
        "bwa.pdf",
        vec![page(1, "Entwicklungsübersicht", words)],
    );
    let layout = load_builtin(ReportKind::Entwicklungsuebersicht).unwrap();
    let result = extract_document(&document, &layout, &ExtractOptions::default()).unwrap();

    let labels: Vec<&str> = result
        .rows
        .iter()
        .filter_map(|r| r.cells[0].text())
        .collect();
    assert_eq!(labels, vec!["Rohertrag", "Kostenarten:", "Personalkosten"]);
    assert!(result.rows[1].cells[1..].iter().all(|c| *c == CellValue::Empty));
    // No month header on the page: default names stay.
    assert_eq!(result.columns[1].name, "Periode 01");
}

// ---------------------------------------------------------------------------
// Scenario 2: no page carries the SuSa title
// ---------------------------------------------------------------------------
#[test]
fn susa_without_title_is_page_not_found() {
    let extractor = MockExtractor {
        pages: vec![
            page(1, "BWA", vec![]),
            page(2, "Entwicklungsübersicht", vec![]),
        ],
    };
    let layout = load_builtin(ReportKind::Susa).unwrap();

    let err = extract_pdf(&[], "Oktober.pdf", &extractor, &layout, &ExtractOptions::default())
        .unwrap_err();

    match err {
        DatevError::PageNotFound {
            document,
            kind,
            searched,
        } => {
            assert_eq!(document, "Oktober.pdf");
            assert_eq!(kind, ReportKind::Susa);
            assert!(searched.contains("Summen und Salden"));
        }
        other => panic!("expected PageNotFound, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario 3: title on pages 2 and 4, page 3 in between without it
// ---------------------------------------------------------------------------
#[test]
fn susa_range_includes_pages_between_title_matches() {
    let mut p2 = susa_title(20.0);
    p2.extend(susa_line(60.0, "120000", "Bank", "", "100,00", "1.000,00 S"));
    p2.extend(susa_line(72.0, "136000", "Geldtransit", "", "", "0,00 S"));

    let p3 = susa_line(60.0, "160000", "Kasse", "50,00 S", "", "75,00 S");

    let mut p4 = susa_title(20.0);
    p4.extend(susa_line(60.0, "440000", "Erlöse 19 % USt", "", "", "12.000,00 H"));

    let pages = vec![
        page(1, "Deckblatt", susa_line(60.0, "999900", "Nicht Teil", "", "", "1,00 S")),
        page(2, "Summen und Salden", p2),
        page(3, "Fortsetzung", p3),
        page(4, "Summen und Salden", p4),
    ];
    let document = Document::new("susa.pdf", pages);
    let layout = load_builtin(ReportKind::Susa).unwrap();

    let result = extract_document(&document, &layout, &ExtractOptions::default()).unwrap();

    assert_eq!(result.selection, PageSelection::Range { start: 2, end: 4 });
    let accounts: Vec<&str> = result
        .rows
        .iter()
        .filter_map(|r| r.get(&result.columns, "Konto").and_then(|c| c.text()))
        .collect();
    assert_eq!(accounts, vec!["120000", "136000", "160000", "440000"]);
    let pages: Vec<usize> = result.rows.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![2, 2, 3, 4]);
    assert_eq!(
        result.rows[3].get(&result.columns, "Saldo"),
        Some(&CellValue::Amount(dec!(-12000.00)))
    );
}

// ---------------------------------------------------------------------------
// Scenario 4: number formats and placeholder dash
// ---------------------------------------------------------------------------
#[test]
fn susa_number_formats_and_placeholder() {
    let mut words = susa_title(20.0);
    words.extend(susa_line(60.0, "480000", "Zinsen", "1.234,56", "(500,00)", "-"));
    let document = Document::new("susa.pdf", vec![page(1, "Summen und Salden", words)]);
    let layout = load_builtin(ReportKind::Susa).unwrap();

    let result = extract_document(&document, &layout, &ExtractOptions::default()).unwrap();

    assert_eq!(result.rows.len(), 1);
    let row = &result.rows[0];
    let cols = &result.columns;
    assert_eq!(row.get(cols, "EB-Wert"), Some(&CellValue::Amount(dec!(1234.56))));
    assert_eq!(row.get(cols, "Periode Soll"), Some(&CellValue::Amount(dec!(-500.00))));
    assert_eq!(row.get(cols, "Saldo"), Some(&CellValue::Empty));
    assert_eq!(row.get(cols, "Beschriftung"), Some(&CellValue::Text("Zinsen".into())));
    assert!(result.warnings.is_empty());
}

// ---------------------------------------------------------------------------
// Scenario 5: template expects 20 rows, extraction yields 18
// ---------------------------------------------------------------------------
#[test]
fn row_count_mismatch_is_a_warning() {
    let mut template_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(template_file, "Konto;Beschriftung").unwrap();
    for i in 0..20 {
        writeln!(template_file, "{};Zeile {}", 100000 + i, i).unwrap();
    }
    template_file.flush().unwrap();
    let template = load_template(template_file.path()).unwrap();
    assert_eq!(template.expected_rows(), 20);

    let mut words = susa_title(10.0);
    for i in 0..18 {
        let konto = format!("{}", 120000 + i);
        words.extend(susa_line(30.0 + 12.0 * i as f32, &konto, "Konto", "", "", "1,00 S"));
    }
    let document = Document::new("susa.pdf", vec![page(1, "Summen und Salden", words)]);
    let layout = load_builtin(ReportKind::Susa).unwrap();
    let options = ExtractOptions {
        template: Some(&template),
        ..Default::default()
    };

    let result = extract_document(&document, &layout, &options).unwrap();

    assert_eq!(result.rows.len(), 18);
    assert_eq!(result.row_count_mismatch(), Some((20, 18)));
    assert_eq!(
        result.warnings,
        vec![ExtractionWarning::RowCountMismatch {
            expected: 20,
            actual: 18
        }]
    );
}

#[test]
fn empty_table_is_a_warning() {
    let document = Document::new(
        "susa.pdf",
        vec![page(1, "Summen und Salden", susa_title(20.0))],
    );
    let layout = load_builtin(ReportKind::Susa).unwrap();
    let result = extract_document(&document, &layout, &ExtractOptions::default()).unwrap();
    assert!(result.rows.is_empty());
    assert_eq!(
        result.warnings,
        vec![ExtractionWarning::EmptyExtraction {
            selection: PageSelection::Range { start: 1, end: 1 }
        }]
    );
}

#[test]
fn explicit_selection_skips_search_and_is_checked_lazily() {
    let document = Document::new(
        "susa.pdf",
        vec![
            page(1, "", susa_line(60.0, "120000", "Bank", "", "", "1,00 S")),
            page(2, "", susa_line(60.0, "160000", "Kasse", "", "", "2,00 S")),
        ],
    );
    let layout = load_builtin(ReportKind::Susa).unwrap();

    let options = ExtractOptions {
        selection: Some(PageSelection::Range { start: 2, end: 2 }),
        ..Default::default()
    };
    let result = extract_document(&document, &layout, &options).unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].page, 2);

    let options = ExtractOptions {
        selection: Some(PageSelection::Range { start: 2, end: 5 }),
        ..Default::default()
    };
    let err = extract_document(&document, &layout, &options).unwrap_err();
    assert!(matches!(err, DatevError::PageNotFound { .. }));
}

#[test]
fn malformed_template_is_fatal() {
    let mut template_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(template_file, "nur eine Spalte").unwrap();
    template_file.flush().unwrap();
    let err = load_template(template_file.path()).unwrap_err();
    assert!(matches!(err, DatevError::MalformedTemplate { .. }));
}

#[test]
fn repeated_extraction_is_identical() {
    let mut words = susa_title(20.0);
    words.extend(susa_line(60.0, "120000", "Bank", "", "", "1,00 S"));
    words.extend(susa_line(72.0, "160000", "Kasse", "", "", "2,00 H"));
    let document = Document::new("susa.pdf", vec![page(1, "Summen und Salden", words)]);
    let layout = load_builtin(ReportKind::Susa).unwrap();

    let first = extract_document(&document, &layout, &ExtractOptions::default()).unwrap();
    let second = extract_document(&document, &layout, &ExtractOptions::default()).unwrap();
    assert_eq!(first.selection, second.selection);
    assert_eq!(first.rows, second.rows);
}
