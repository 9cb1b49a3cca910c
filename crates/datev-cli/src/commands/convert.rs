use datev_core::error::DatevError;
use datev_core::export::delimited::write_csv;
use datev_core::export::xlsx::write_xlsx;
use datev_core::extraction::pdftotext::PdftotextExtractor;
use datev_core::extraction::{Document, PdfExtractor};
use datev_core::layout::builtin::load_builtin;
use datev_core::layout::{load_layout, Layout};
use datev_core::model::{ExtractionResult, PageSelection, ReportKind};
use datev_core::structure::{load_template, StructureTemplate};
use datev_core::{extract_document, ExtractOptions};
use std::path::{Path, PathBuf};

use crate::output;

/// Structure export picked up for the Entwicklungsuebersicht when no
/// `--structure` is given and the file exists.
pub const DEFAULT_STRUCTURE: &str = "DATEV Struktur/BWA Export Datei -leer -.csv";

/// Pages asked for on the command line. Partial ranges need the page count of
/// the document and are resolved once it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Search,
    Exact(PageSelection),
    From(usize),
    Until(usize),
}

impl PageRequest {
    pub fn single(page: Option<usize>) -> PageRequest {
        match page {
            Some(page) => PageRequest::Exact(PageSelection::Single(page)),
            None => PageRequest::Search,
        }
    }

    pub fn span(start: Option<usize>, end: Option<usize>) -> PageRequest {
        match (start, end) {
            (None, None) => PageRequest::Search,
            (Some(start), Some(end)) => PageRequest::Exact(PageSelection::Range { start, end }),
            (Some(start), None) => PageRequest::From(start),
            (None, Some(end)) => PageRequest::Until(end),
        }
    }

    pub fn resolve(self, page_count: usize) -> Option<PageSelection> {
        match self {
            PageRequest::Search => None,
            PageRequest::Exact(selection) => Some(selection),
            // Past the end still yields a range so the lookup reports the page count.
            PageRequest::From(start) => Some(PageSelection::Range {
                start,
                end: page_count.max(start),
            }),
            PageRequest::Until(end) => Some(PageSelection::Range { start: 1, end }),
        }
    }
}

pub struct ConvertOptions {
    pub kind: ReportKind,
    pub pages: PageRequest,
    pub pdf: Option<PathBuf>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub out: Option<PathBuf>,
    pub excel: Option<PathBuf>,
    pub excel_dir: Option<PathBuf>,
    pub write_excel: bool,
    pub structure: Option<PathBuf>,
    pub layout: Option<PathBuf>,
    pub format: String,
}

/// Files written for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub csv: PathBuf,
    pub excel: Option<PathBuf>,
}

impl Targets {
    fn all_exist(&self) -> bool {
        self.csv.exists() && self.excel.as_ref().map_or(true, |p| p.exists())
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

pub fn run(options: ConvertOptions) -> Result<(), DatevError> {
    let layout = resolve_layout(&options)?;
    let template = resolve_template(&options)?;

    if !PdftotextExtractor::is_available() {
        return Err(DatevError::PdftotextNotFound);
    }
    let extractor = PdftotextExtractor::new();

    let converter = Converter {
        options: &options,
        layout: &layout,
        template: template.as_ref(),
        extractor: &extractor,
    };

    let dir = match &options.pdf {
        Some(path) if !path.is_dir() => return converter.convert_single(path),
        Some(dir) => dir,
        None => &options.input_dir,
    };
    let summary = converter.convert_batch(dir)?;
    print!("{}", output::table::format_batch_summary(&summary));
    Ok(())
}

fn resolve_layout(options: &ConvertOptions) -> Result<Layout, DatevError> {
    let Some(path) = &options.layout else {
        return load_builtin(options.kind);
    };

    let layout = load_layout(path)?;
    if layout.kind != options.kind {
        return Err(DatevError::LayoutInvalid(format!(
            "{} describes a {} report, expected {}",
            path.display(),
            layout.kind,
            options.kind
        )));
    }
    tracing::info!("using layout '{}' from {}", layout.name, path.display());
    Ok(layout)
}

fn resolve_template(options: &ConvertOptions) -> Result<Option<StructureTemplate>, DatevError> {
    if let Some(path) = &options.structure {
        return load_template(path).map(Some);
    }

    let default = Path::new(DEFAULT_STRUCTURE);
    if options.kind == ReportKind::Entwicklungsuebersicht && default.is_file() {
        tracing::debug!("using structure template {}", default.display());
        return load_template(default).map(Some);
    }

    Ok(None)
}

struct Converter<'a> {
    options: &'a ConvertOptions,
    layout: &'a Layout,
    template: Option<&'a StructureTemplate>,
    extractor: &'a dyn PdfExtractor,
}

impl Converter<'_> {
    fn convert_single(&self, pdf: &Path) -> Result<(), DatevError> {
        let targets = single_targets(self.options, pdf);
        let result = self.extract(pdf)?;
        self.write(&result, &targets)?;

        match self.options.format.as_str() {
            "json" => output::json::print(&result)?,
            _ => print!("{}", output::table::format_result(&result)),
        }
        Ok(())
    }

    /// Convert every PDF in `dir`. A failing document is logged and counted,
    /// the others are still converted.
    fn convert_batch(&self, dir: &Path) -> Result<BatchSummary, DatevError> {
        let pdfs = list_pdfs(dir)?;
        if pdfs.is_empty() {
            return Err(DatevError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no PDF files found in {}", dir.display()),
            )));
        }
        tracing::info!("found {} PDF(s) in {}", pdfs.len(), dir.display());

        let mut summary = BatchSummary::default();
        for pdf in pdfs {
            let targets = batch_targets(self.options, &pdf);
            if targets.all_exist() {
                tracing::info!("{}: already converted, skipping", pdf.display());
                summary.skipped.push(pdf);
                continue;
            }

            let outcome = self
                .extract(&pdf)
                .and_then(|result| self.write(&result, &targets));
            match outcome {
                Ok(()) => summary.converted.push(pdf),
                Err(e) => {
                    tracing::error!("{}: {e}", pdf.display());
                    summary.failed.push((pdf, e.to_string()));
                }
            }
        }

        Ok(summary)
    }

    fn extract(&self, pdf: &Path) -> Result<ExtractionResult, DatevError> {
        let bytes = std::fs::read(pdf)?;
        let pages = self.extractor.extract_pages(&bytes)?;
        let document = Document::new(document_name(pdf), pages);
        tracing::debug!(
            backend = self.extractor.backend_name(),
            pages = document.pages.len(),
            "opened {}",
            pdf.display()
        );

        let options = ExtractOptions {
            selection: self.options.pages.resolve(document.pages.len()),
            template: self.template,
        };
        let result = extract_document(&document, self.layout, &options)?;

        for warning in &result.warnings {
            tracing::warn!("{}: {warning}", result.document);
        }
        tracing::info!(
            "{}: {} rows from {}",
            result.document,
            result.rows.len(),
            result.selection
        );
        Ok(result)
    }

    fn write(&self, result: &ExtractionResult, targets: &Targets) -> Result<(), DatevError> {
        write_csv(result, &targets.csv)?;
        tracing::info!("wrote {}", targets.csv.display());

        if let Some(excel) = &targets.excel {
            write_xlsx(result, excel)?;
            tracing::info!("wrote {}", excel.display());
        }
        Ok(())
    }
}

fn document_name(pdf: &Path) -> String {
    pdf.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf.display().to_string())
}

fn output_suffix(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Entwicklungsuebersicht => "jahresentwicklung",
        ReportKind::Susa => "susa",
    }
}

/// `<output_dir>/<stem>_<suffix>.csv`, plus the matching `.xlsx` unless Excel
/// output is switched off.
fn batch_targets(options: &ConvertOptions, pdf: &Path) -> Targets {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let base = format!("{}_{}", stem, output_suffix(options.kind));

    let excel = options.write_excel.then(|| {
        options
            .excel_dir
            .as_deref()
            .unwrap_or(&options.output_dir)
            .join(format!("{base}.xlsx"))
    });

    Targets {
        csv: options.output_dir.join(format!("{base}.csv")),
        excel,
    }
}

/// Targets for a single file: `--out` and `--excel` win; without `--excel` the
/// workbook sits next to an explicit `--out`.
fn single_targets(options: &ConvertOptions, pdf: &Path) -> Targets {
    let defaults = batch_targets(options, pdf);
    let excel = match (&options.excel, &options.out) {
        _ if !options.write_excel => None,
        (Some(excel), _) => Some(excel.clone()),
        (None, Some(out)) => Some(out.with_extension("xlsx")),
        (None, None) => defaults.excel,
    };
    Targets {
        csv: options.out.clone().unwrap_or(defaults.csv),
        excel,
    }
}

/// PDF files directly inside `dir`, sorted by path.
fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, DatevError> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}
