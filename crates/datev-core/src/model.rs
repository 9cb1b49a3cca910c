use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::parsing::amount::format_amount;

/// The two DATEV report layouts this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// BWA Jahresentwicklungsuebersicht, always a single page.
    Entwicklungsuebersicht,
    /// Summen- und Saldenliste, a contiguous run of pages.
    Susa,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Entwicklungsuebersicht => write!(f, "Entwicklungsuebersicht"),
            ReportKind::Susa => write!(f, "SuSa"),
        }
    }
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Entwicklungsuebersicht, ReportKind::Susa];

    pub fn from_str_loose(s: &str) -> Option<ReportKind> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("entwicklung") || lower.contains("bwa") {
            Some(ReportKind::Entwicklungsuebersicht)
        } else if lower.starts_with("susa") || lower.contains("salden") {
            Some(ReportKind::Susa)
        } else {
            None
        }
    }

    /// Whether title search collects every matching page instead of the first one.
    pub fn spans_pages(&self) -> bool {
        matches!(self, ReportKind::Susa)
    }

    /// Short identifier used in layout files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            ReportKind::Entwicklungsuebersicht => "entwicklungsuebersicht",
            ReportKind::Susa => "susa",
        }
    }
}

/// Pages an extraction reads, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSelection {
    Single(usize),
    Range { start: usize, end: usize },
}

impl PageSelection {
    pub fn first(&self) -> usize {
        match *self {
            PageSelection::Single(page) => page,
            PageSelection::Range { start, .. } => start,
        }
    }

    pub fn last(&self) -> usize {
        match *self {
            PageSelection::Single(page) => page,
            PageSelection::Range { end, .. } => end,
        }
    }

    pub fn pages(&self) -> RangeInclusive<usize> {
        self.first()..=self.last()
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PageSelection::Single(page) => write!(f, "page {page}"),
            PageSelection::Range { start, end } if start == end => write!(f, "page {start}"),
            PageSelection::Range { start, end } => write!(f, "pages {start}-{end}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// One cell of an extracted row.
///
/// Amount columns hold `Empty` when the token was a placeholder (such as `-`)
/// or nothing was printed in that column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Text(String),
    Amount(Decimal),
    Empty,
}

impl CellValue {
    pub fn text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Amount(_) => false,
            CellValue::Empty => true,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Amount(v) => write!(f, "{}", format_amount(*v)),
            CellValue::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRow {
    /// Page the row was read from.
    pub page: usize,
    /// One value per column, in column order.
    pub cells: Vec<CellValue>,
}

impl ExtractedRow {
    pub fn get<'a>(&'a self, columns: &[Column], name: &str) -> Option<&'a CellValue> {
        let idx = columns.iter().position(|c| c.name == name)?;
        self.cells.get(idx)
    }
}

/// Non-fatal findings attached to a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ExtractionWarning {
    RowCountMismatch { expected: usize, actual: usize },
    EmptyExtraction { selection: PageSelection },
    MalformedCell {
        page: usize,
        column: String,
        text: String,
    },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::RowCountMismatch { expected, actual } => write!(
                f,
                "structure template expects {expected} rows, extraction produced {actual}"
            ),
            ExtractionWarning::EmptyExtraction { selection } => {
                write!(f, "no rows found on {selection}")
            }
            ExtractionWarning::MalformedCell { page, column, text } => write!(
                f,
                "page {page}: column '{column}' holds malformed number '{text}'"
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Identifier of the source document (usually its file name).
    pub document: String,
    pub kind: ReportKind,
    pub selection: PageSelection,
    pub columns: Vec<Column>,
    pub rows: Vec<ExtractedRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractionResult {
    /// Expected and actual counts if the structure check failed.
    pub fn row_count_mismatch(&self) -> Option<(usize, usize)> {
        self.warnings.iter().find_map(|w| match w {
            ExtractionWarning::RowCountMismatch { expected, actual } => Some((*expected, *actual)),
            _ => None,
        })
    }
}
