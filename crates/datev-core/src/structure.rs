use std::path::{Path, PathBuf};

use crate::error::DatevError;
use crate::model::{ExtractedRow, ExtractionWarning};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Expected row layout of a report, read from a DATEV structure export.
///
/// Only the number of rows is compared; the identifiers are kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureTemplate {
    pub source: PathBuf,
    pub identifiers: Vec<String>,
}

impl StructureTemplate {
    pub fn expected_rows(&self) -> usize {
        self.identifiers.len()
    }
}

/// Load a `;`-separated structure file. The first line is a header with at
/// least two columns; every following record contributes its first field.
pub fn load_template(path: &Path) -> Result<StructureTemplate, DatevError> {
    let bytes = std::fs::read(path).map_err(|e| DatevError::MalformedTemplate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_template(&bytes, path)
}

pub fn parse_template(bytes: &[u8], source: &Path) -> Result<StructureTemplate, DatevError> {
    let malformed = |reason: String| DatevError::MalformedTemplate {
        path: source.to_path_buf(),
        reason,
    };

    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let header_len = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .len();
    if header_len < 2 {
        return Err(malformed(format!(
            "header needs at least 2 columns, found {}",
            header_len
        )));
    }

    let mut identifiers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        if record.is_empty() {
            continue;
        }
        identifiers.push(record.get(0).unwrap_or("").trim().to_string());
    }

    Ok(StructureTemplate {
        source: source.to_path_buf(),
        identifiers,
    })
}

/// Compare the produced row count with the template, if one was given.
///
/// Never filters or changes the rows.
pub fn validate(rows: &[ExtractedRow], template: Option<&StructureTemplate>) -> Option<ExtractionWarning> {
    let template = template?;
    let expected = template.expected_rows();
    let actual = rows.len();
    if expected == actual {
        None
    } else {
        Some(ExtractionWarning::RowCountMismatch { expected, actual })
    }
}
