use std::path::PathBuf;

use crate::model::ReportKind;

#[derive(Debug, thiserror::Error)]
pub enum DatevError {
    #[error("{document}: no {kind} page found ({searched})")]
    PageNotFound {
        document: String,
        kind: ReportKind,
        searched: String,
    },

    #[error("malformed structure template {path}: {reason}")]
    MalformedTemplate { path: PathBuf, reason: String },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load layout from {path}: {reason}")]
    LayoutLoad { path: PathBuf, reason: String },

    #[error("invalid layout: {0}")]
    LayoutInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
