pub mod lines;
pub mod pdftotext;

use crate::error::DatevError;

/// Bounding box in PDF points, origin at the top-left corner of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    pub fn x_center(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }
}

/// A positioned text fragment, usually one word.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Full page text, used for title search and header detection.
    pub text: String,
    pub words: Vec<Word>,
}

/// An opened report: its pages in order plus an identifier for diagnostics.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(source: impl Into<String>, pages: Vec<Page>) -> Self {
        Document {
            source: source.into(),
            pages,
        }
    }

    /// Page by 1-based number.
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|idx| self.pages.get(idx))
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text and word positions from PDF bytes, one Page per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<Page>, DatevError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
