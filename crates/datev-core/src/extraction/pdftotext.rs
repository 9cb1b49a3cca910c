use crate::error::DatevError;
use crate::extraction::{BBox, Page, PdfExtractor, Word};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Page text comes from `pdftotext -layout`, word positions from
/// `pdftotext -bbox`.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<Page>, DatevError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| DatevError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| DatevError::Extraction(e.to_string()))?;
        let tmp_path = tmpfile.path().to_path_buf();

        let text = run_pdftotext("-layout", &tmp_path)?;
        let xml = run_pdftotext("-bbox", &tmp_path)?;
        let word_pages = parse_bbox_xml(&xml)?;

        // pdftotext terminates every page with a form feed.
        let texts: Vec<&str> = text.split('\x0c').collect();

        let pages = word_pages
            .into_iter()
            .enumerate()
            .map(|(i, words)| Page {
                number: i + 1,
                text: texts.get(i).map(|t| t.to_string()).unwrap_or_default(),
                words,
            })
            .collect::<Vec<_>>();

        tracing::debug!(pages = pages.len(), "pdftotext extracted pages");
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(mode: &str, pdf_path: &Path) -> Result<String, DatevError> {
    let output = Command::new("pdftotext")
        .arg(mode)
        .arg(pdf_path)
        .arg("-")
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DatevError::PdftotextNotFound
            } else {
                DatevError::Extraction(format!("pdftotext {} failed: {}", mode, e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(DatevError::PdftotextFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `pdftotext -bbox` XHTML into the words of each page.
fn parse_bbox_xml(xml: &str) -> Result<Vec<Vec<Word>>, DatevError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Vec<Word>> = Vec::new();
    let mut current_bbox: Option<BBox> = None;
    let mut current_text = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(tag) if tag.name().as_ref() == b"page" => pages.push(Vec::new()),
            Event::Start(tag) if tag.name().as_ref() == b"word" => {
                current_bbox = Some(parse_word_bbox(&tag)?);
                current_text.clear();
            }
            Event::Text(text) if current_bbox.is_some() => {
                current_text.push_str(&text.unescape().map_err(xml_error)?);
            }
            Event::End(tag) if tag.name().as_ref() == b"word" => {
                if let (Some(bbox), Some(words)) = (current_bbox.take(), pages.last_mut()) {
                    let text = current_text.trim();
                    if !text.is_empty() {
                        words.push(Word {
                            text: text.to_string(),
                            bbox,
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn parse_word_bbox(tag: &BytesStart<'_>) -> Result<BBox, DatevError> {
    let mut coords: [Option<f32>; 4] = [None; 4];
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| DatevError::Extraction(format!("bad word attribute: {e}")))?;
        let slot = match attr.key.as_ref() {
            b"xMin" => 0,
            b"yMin" => 1,
            b"xMax" => 2,
            b"yMax" => 3,
            _ => continue,
        };
        coords[slot] = std::str::from_utf8(&attr.value)
            .ok()
            .and_then(|v| v.trim().parse().ok());
    }

    match coords {
        [Some(x_min), Some(y_min), Some(x_max), Some(y_max)] => Ok(BBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }),
        _ => Err(DatevError::Extraction(
            "pdftotext -bbox returned a word without coordinates".into(),
        )),
    }
}

fn xml_error(e: quick_xml::Error) -> DatevError {
    DatevError::Extraction(format!("unreadable pdftotext -bbox output: {e}"))
}
